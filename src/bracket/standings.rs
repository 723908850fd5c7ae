use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::rating::ParticipantId;

use super::types::{BracketMatch, Entrant};

/// Aggregated round-robin results of one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub participant_id: ParticipantId,
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points_for: f64,
    pub points_against: f64,
    /// 1-based position in the table
    pub rank: u32,
}

impl TableRow {
    fn new(entrant: &Entrant) -> Self {
        Self {
            participant_id: entrant.participant_id.clone(),
            name: entrant.name.clone(),
            played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            points_for: 0.0,
            points_against: 0.0,
            rank: 0,
        }
    }

    pub fn point_difference(&self) -> f64 {
        self.points_for - self.points_against
    }

    fn record(&mut self, scored: f64, conceded: f64) {
        self.played += 1;
        self.points_for += scored;
        self.points_against += conceded;
        match scored.partial_cmp(&conceded) {
            Some(Ordering::Greater) => self.wins += 1,
            Some(Ordering::Less) => self.losses += 1,
            _ => self.draws += 1,
        }
    }
}

/// Ranks participants by wins, then points scored.
///
/// Rows that stay level keep the order in which their participants first
/// appear in `matches`. Only matches with both scores recorded count.
pub fn compute_round_robin_table(matches: &[BracketMatch]) -> Vec<TableRow> {
    let mut rows = tally(matches);

    rows.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.points_for.total_cmp(&a.points_for))
    });

    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = (idx + 1) as u32;
    }

    rows
}

/// Per-participant totals in first-appearance order
pub fn tally(matches: &[BracketMatch]) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = Vec::new();

    for m in matches {
        for entrant in [&m.player1, &m.player2].into_iter().flatten() {
            row_for(&mut rows, entrant);
        }

        let (Some(p1), Some(p2)) = (&m.player1, &m.player2) else {
            continue;
        };
        let (Some(s1), Some(s2)) = (m.score_player1, m.score_player2) else {
            continue;
        };

        row_for(&mut rows, p1).record(s1, s2);
        row_for(&mut rows, p2).record(s2, s1);
    }

    rows
}

fn row_for<'a>(rows: &'a mut Vec<TableRow>, entrant: &Entrant) -> &'a mut TableRow {
    let idx = match rows
        .iter()
        .position(|r| r.participant_id == entrant.participant_id)
    {
        Some(idx) => idx,
        None => {
            rows.push(TableRow::new(entrant));
            rows.len() - 1
        }
    };
    &mut rows[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played(id: &str, a: &str, b: &str, sa: f64, sb: f64) -> BracketMatch {
        let mut m = BracketMatch::new(
            id.to_string(),
            Some(Entrant::new(a, &a.to_uppercase())),
            Some(Entrant::new(b, &b.to_uppercase())),
        );
        m.score_player1 = Some(sa);
        m.score_player2 = Some(sb);
        m
    }

    #[test]
    fn test_four_player_pool() {
        let matches = vec![
            played("1", "c", "d", 3.0, 3.0),
            played("2", "a", "b", 5.0, 2.0),
            played("3", "a", "c", 5.0, 0.0),
            played("4", "b", "d", 5.0, 0.0),
            played("5", "a", "d", 5.0, 0.0),
            played("6", "b", "c", 5.0, 0.0),
        ];

        let table = compute_round_robin_table(&matches);
        let order: Vec<&str> = table.iter().map(|r| r.participant_id.as_str()).collect();

        assert_eq!(order, vec!["a", "b", "c", "d"]);
        assert_eq!(table[0].wins, 3);
        assert_eq!(table[1].wins, 2);
        assert_eq!((table[2].wins, table[2].draws), (0, 1));
        assert_eq!(table[2].points_for, table[3].points_for);
        assert_eq!(table.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_points_for_breaks_ties() {
        let matches = vec![
            played("1", "a", "b", 2.0, 5.0),
            played("2", "c", "a", 1.0, 7.0),
            played("3", "b", "c", 3.0, 4.0),
        ];

        let table = compute_round_robin_table(&matches);
        let order: Vec<&str> = table.iter().map(|r| r.participant_id.as_str()).collect();
        // everyone has one win; a scored 9, b 8, c 5
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(table[0].point_difference(), 3.0);
    }

    #[test]
    fn test_unscored_matches_are_ignored() {
        let mut pending = played("1", "a", "b", 0.0, 0.0);
        pending.score_player2 = None;

        let table = compute_round_robin_table(&[pending]);
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|r| r.played == 0));
    }

    #[test]
    fn test_nan_points_do_not_break_ranking() {
        let matches = vec![
            played("1", "a", "b", f64::NAN, 1.0),
            played("2", "c", "d", 4.0, 2.0),
            played("3", "b", "d", 3.0, 1.0),
        ];

        let table = compute_round_robin_table(&matches);
        assert_eq!(table.len(), 4);
        assert_eq!(table.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(table[3].participant_id, "d");
    }
}
