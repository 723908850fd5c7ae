use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::info;

use crate::config::settings::{SeasonSettings, WinnerAttribution};
use crate::domain::{resolve_timestamp, MatchRecord, MatchSide};
use crate::rating::{ParticipantId, RatingValue, STARTING_RATING};

use super::streaks::longest_win_streak;
use super::types::{SeasonRecord, SeasonRow};

/// Inputs describing the season being closed
pub struct SeasonClosing<'a> {
    pub venue_id: &'a str,
    pub season_index: u32,
    pub closed_at: DateTime<Utc>,
    /// Current venue rating of each participant
    pub ratings: &'a BTreeMap<ParticipantId, RatingValue>,
}

#[derive(Debug, Default)]
struct Summary {
    participant_id: ParticipantId,
    name: String,
    matches_played: u32,
    wins: u32,
    losses: u32,
    total_added_points: f64,
    results: Vec<bool>,
    last_venue_rating: Option<RatingValue>,
}

/// Closes a venue season. Returns `None` when the venue has no matches.
pub fn finalize_season(
    closing: &SeasonClosing<'_>,
    matches: &[MatchRecord],
    settings: &SeasonSettings,
) -> Option<SeasonRecord> {
    let ordered = chronological(matches, closing.venue_id);
    if ordered.is_empty() {
        info!("Venue {} has no matches, nothing to finalize", closing.venue_id);
        return None;
    }

    let summaries = summarize(&ordered, settings.attribution);
    let average = average_matches_played(&summaries);

    let mut rows: Vec<SeasonRow> = summaries
        .into_iter()
        .map(|s| {
            let rating = closing
                .ratings
                .get(&s.participant_id)
                .copied()
                .or(s.last_venue_rating)
                .unwrap_or(STARTING_RATING);
            let final_score = composite_score(
                s.wins,
                rating,
                s.total_added_points,
                s.matches_played,
                average,
                settings,
            );
            SeasonRow {
                longest_win_streak: longest_win_streak(&s.results),
                participant_id: s.participant_id,
                name: s.name,
                place: 0,
                matches_played: s.matches_played,
                wins: s.wins,
                losses: s.losses,
                total_added_points: s.total_added_points,
                final_score,
            }
        })
        .collect();

    // Stable, so equal scores keep first-appearance order
    rows.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    for (idx, row) in rows.iter_mut().enumerate() {
        row.place = idx + 1;
    }

    info!(
        "Finalized season {} of venue {}: {} participants, {} matches",
        closing.season_index,
        closing.venue_id,
        rows.len(),
        ordered.len()
    );

    Some(SeasonRecord {
        venue_id: closing.venue_id.to_string(),
        season_index: closing.season_index,
        closed_at: closing.closed_at,
        average_matches_played: average,
        rows,
        match_ids: ordered.iter().map(|m| m.id.clone()).collect(),
    })
}

/// `wins * 2 + rating * 0.1` plus rating points gained, the latter scaled
/// down for participants who played more than the venue average. Playing
/// less than the average costs 10% of the total.
pub fn composite_score(
    wins: u32,
    current_rating: RatingValue,
    total_added_points: f64,
    matches_played: u32,
    average: f64,
    settings: &SeasonSettings,
) -> f64 {
    let base = wins as f64 * settings.win_weight + current_rating * settings.rating_weight;
    let played = matches_played as f64;

    let normalized = if average != 0.0 && played > average {
        total_added_points / (played / average)
    } else {
        total_added_points
    };

    let score = base + normalized;
    if played < average {
        score * settings.underplay_penalty
    } else {
        score
    }
}

fn chronological<'a>(matches: &'a [MatchRecord], venue_id: &str) -> Vec<&'a MatchRecord> {
    let mut ordered: Vec<(DateTime<Utc>, &MatchRecord)> = matches
        .iter()
        .filter(|m| m.venue_id.as_deref() == Some(venue_id))
        .map(|m| (resolve_timestamp(m.timestamp.as_ref()), m))
        .collect();
    ordered.sort_by_key(|(at, _)| *at);
    ordered.into_iter().map(|(_, m)| m).collect()
}

fn summarize(matches: &[&MatchRecord], attribution: WinnerAttribution) -> Vec<Summary> {
    let mut summaries: Vec<Summary> = Vec::new();

    for record in matches {
        for side in [&record.home, &record.away] {
            let Some(participant_id) = side.participant_id.as_deref() else {
                continue;
            };
            let won = side_won(record, side, attribution);
            let summary = summary_for(&mut summaries, participant_id);

            if !side.name.is_empty() {
                summary.name = side.name.clone();
            }
            summary.matches_played += 1;
            if let Some(annotation) = &side.annotation {
                summary.total_added_points += annotation.venue_rating_delta;
                summary.last_venue_rating = Some(annotation.new_venue_rating);
            }
            match won {
                Some(true) => summary.wins += 1,
                Some(false) => summary.losses += 1,
                None => {}
            }
            if let Some(won) = won {
                summary.results.push(won);
            }
        }
    }

    summaries
}

/// `None` when the match has no declared winner.
fn side_won(
    record: &MatchRecord,
    side: &MatchSide,
    attribution: WinnerAttribution,
) -> Option<bool> {
    match attribution {
        WinnerAttribution::ByName => {
            let winner = record.winner_name.as_deref()?;
            Some(winner == side.name)
        }
        WinnerAttribution::ById => {
            let winner = record
                .winner_id
                .clone()
                .or_else(|| record.winning_side().and_then(|s| s.participant_id.clone()))?;
            Some(side.participant_id.as_deref() == Some(winner.as_str()))
        }
    }
}

fn summary_for<'a>(summaries: &'a mut Vec<Summary>, participant_id: &str) -> &'a mut Summary {
    let idx = match summaries.iter().position(|s| s.participant_id == participant_id) {
        Some(idx) => idx,
        None => {
            summaries.push(Summary {
                participant_id: participant_id.to_string(),
                ..Summary::default()
            });
            summaries.len() - 1
        }
    };
    &mut summaries[idx]
}

fn average_matches_played(summaries: &[Summary]) -> f64 {
    if summaries.is_empty() {
        return 0.0;
    }
    let total: u32 = summaries.iter().map(|s| s.matches_played).sum();
    total as f64 / summaries.len() as f64
}
