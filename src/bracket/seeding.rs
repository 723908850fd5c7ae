use super::standings::TableRow;
use super::types::{BracketMatch, Entrant, MatchStatus};

const KNOCKOUT_SIZES: [usize; 3] = [8, 4, 2];

/// Every entrant against every other entrant exactly once.
pub fn round_robin_pairings(entrants: &[Entrant]) -> Vec<(Entrant, Entrant)> {
    let mut pairs = Vec::new();
    for i in 0..entrants.len() {
        for j in (i + 1)..entrants.len() {
            pairs.push((entrants[i].clone(), entrants[j].clone()));
        }
    }
    pairs
}

/// Number of entrants promoted to the knockout stage.
///
/// A requested size is honoured when the field is large enough; otherwise the
/// largest supported size that fits is used.
pub fn knockout_size(entrants: usize, requested: Option<usize>) -> usize {
    match requested {
        Some(size) if KNOCKOUT_SIZES.contains(&size) && size <= entrants => size,
        _ => KNOCKOUT_SIZES
            .iter()
            .copied()
            .find(|s| *s <= entrants)
            .unwrap_or(2),
    }
}

/// Seed numbers in bracket position order, e.g. `[1, 4, 2, 3]` for four.
///
/// Pairing the result sequentially puts seed 1 against the lowest seed and
/// keeps the top two seeds apart until the final.
pub fn bracket_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let next = order.len() * 2;
        order = order.iter().flat_map(|&s| [s, next + 1 - s]).collect();
    }
    order
}

/// Knockout slots filled from round-robin ranks, in bracket order.
pub fn knockout_slots(table: &[TableRow], size: usize) -> Vec<Option<Entrant>> {
    bracket_order(size)
        .into_iter()
        .map(|seed| {
            table.get(seed - 1).map(|row| Entrant {
                participant_id: row.participant_id.clone(),
                name: row.name.clone(),
                seed: Some(row.rank),
            })
        })
        .collect()
}

/// Pairs slot `i` with slot `i + 1`; an odd trailing slot gets an empty
/// opponent.
pub fn pair_sequentially(round_index: usize, slots: Vec<Option<Entrant>>) -> Vec<BracketMatch> {
    let mut matches = Vec::with_capacity(slots.len().div_ceil(2));
    let mut slots = slots.into_iter();
    let mut idx = 0;

    while let Some(first) = slots.next() {
        let second = slots.next().flatten();
        matches.push(BracketMatch::new(match_id(round_index, idx), first, second));
        idx += 1;
    }

    for m in &mut matches {
        settle_bye(m);
    }

    matches
}

/// A match with a single entrant is decided without being played
pub fn settle_bye(m: &mut BracketMatch) {
    if !m.is_bye() {
        return;
    }
    m.winner_id = m.bye_entrant().map(|e| e.participant_id.clone());
    m.match_status = MatchStatus::Finished;
}

pub fn match_id(round_index: usize, idx: usize) -> String {
    format!("r{}-m{}", round_index, idx + 1)
}
