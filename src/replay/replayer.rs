use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::config::VenueDirectory;
use crate::domain::{resolve_timestamp, MatchRecord, RatingPoint, SideAnnotation};
use crate::rating::{self, RatingPolicy, RatingScope, RatingValue};

use super::state::ReplayState;
use super::summary::ReplaySummary;

/// How a processed match was scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    HomeWin,
    AwayWin,
    Tie,
}

impl MatchOutcome {
    /// Whether the side that wins with `side_win` took this match
    pub fn won_by(self, side_win: MatchOutcome) -> Option<bool> {
        match self {
            MatchOutcome::Tie => None,
            outcome => Some(outcome == side_win),
        }
    }
}

/// Result of replaying a set of matches
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub state: ReplayState,
    /// Processed matches in replay order, annotated with rating fields
    pub matches: Vec<MatchRecord>,
    pub summary: ReplaySummary,
}

/// Rebuilds rating state from match history.
pub struct HistoryReplayer<'a> {
    policy: RatingPolicy,
    starting_rating: RatingValue,
    venues: &'a VenueDirectory,
}

struct SideRatings {
    global: RatingValue,
    venue: RatingValue,
    venue_k: f64,
}

impl<'a> HistoryReplayer<'a> {
    pub fn new(
        policy: RatingPolicy,
        starting_rating: RatingValue,
        venues: &'a VenueDirectory,
    ) -> Self {
        Self {
            policy,
            starting_rating,
            venues,
        }
    }

    /// Replays `matches` from scratch, every participant starting fresh.
    pub fn rebuild(&self, activity: &str, matches: Vec<MatchRecord>) -> ReplayOutcome {
        let state = ReplayState::new(activity, self.starting_rating);
        self.replay_onto(state, matches)
    }

    /// Replays `matches` on top of an existing state.
    pub fn replay_onto(&self, mut state: ReplayState, matches: Vec<MatchRecord>) -> ReplayOutcome {
        let mut summary = ReplaySummary::default();
        let ordered = order_chronologically(matches, &mut summary);
        let mut processed = Vec::with_capacity(ordered.len());

        for (at, mut record) in ordered {
            match self.apply_match(&mut state, &mut record, at) {
                Some(outcome) => {
                    summary.processed += 1;
                    if outcome == MatchOutcome::Tie {
                        summary.ties += 1;
                    }
                    if !record.is_ranked() {
                        summary.unranked += 1;
                    }
                    processed.push(record);
                }
                None => {
                    warn!("Skipping match {}: missing participant or venue id", record.id);
                    summary.skipped += 1;
                }
            }
        }

        info!(
            "Replayed {} matches for activity '{}' ({})",
            summary.total(),
            state.activity(),
            summary
        );

        ReplayOutcome {
            state,
            matches: processed,
            summary,
        }
    }

    /// Applies one match to `state` and annotates `record`.
    ///
    /// Returns `None` without touching anything when the match lacks a
    /// participant or venue id.
    pub fn apply_match(
        &self,
        state: &mut ReplayState,
        record: &mut MatchRecord,
        at: DateTime<Utc>,
    ) -> Option<MatchOutcome> {
        let (home_id, away_id, venue_id) = record
            .identifiers()
            .map(|(h, a, v)| (h.to_string(), a.to_string(), v.to_string()))?;

        let mode = self.venues.mode(&venue_id);
        let home = self.side_ratings(state, &home_id, &venue_id);
        let away = self.side_ratings(state, &away_id, &venue_id);

        let outcome = outcome_of(record);
        let rated = record.is_ranked() && outcome != MatchOutcome::Tie;
        let (home_score, away_score) = (record.home.score, record.away.score);

        let delta = |a: &SideRatings, b: &SideRatings, sa: f64, sb: f64, global: bool| {
            if !rated {
                return 0.0;
            }
            let (own, other, scope, k) = if global {
                (a.global, b.global, RatingScope::Global, self.policy.global_k)
            } else {
                (a.venue, b.venue, RatingScope::Venue(mode), a.venue_k)
            };
            rating::compute_delta_with(&self.policy, own, other, sa, sb, scope, k)
        };

        let home_annotation = annotation(
            &home,
            delta(&home, &away, home_score, away_score, true),
            delta(&home, &away, home_score, away_score, false),
        );
        let away_annotation = annotation(
            &away,
            delta(&away, &home, away_score, home_score, true),
            delta(&away, &home, away_score, home_score, false),
        );

        debug!(
            "Match {}: {} {:+} / {} {:+} at {}",
            record.id,
            home_id,
            home_annotation.rating_delta,
            away_id,
            away_annotation.rating_delta,
            venue_id
        );

        let home_won = outcome.won_by(MatchOutcome::HomeWin);
        let away_won = outcome.won_by(MatchOutcome::AwayWin);
        let at_venue = (venue_id.as_str(), at);
        commit_side(state, &home_id, &record.home.name, &home_annotation, at_venue, home_won);
        commit_side(state, &away_id, &record.away.name, &away_annotation, at_venue, away_won);

        record.home.annotation = Some(home_annotation);
        record.away.annotation = Some(away_annotation);
        let winner = record.winning_side().map(|s| (s.name.clone(), s.participant_id.clone()));
        record.winner_name = winner.as_ref().map(|(name, _)| name.clone());
        record.winner_id = winner.and_then(|(_, id)| id);

        Some(outcome)
    }

    fn side_ratings(
        &self,
        state: &mut ReplayState,
        participant_id: &str,
        venue_id: &str,
    ) -> SideRatings {
        let mode = self.venues.mode(venue_id);
        let base_k = self.venues.k_factor(venue_id);
        let participant = state.participant_mut(participant_id);

        SideRatings {
            global: participant.global_rating,
            venue: participant.venue_rating(venue_id, self.starting_rating),
            venue_k: rating::dynamic_k_with(
                &self.policy,
                base_k,
                participant.matches_at(venue_id),
                mode,
            ),
        }
    }
}

fn order_chronologically(
    matches: Vec<MatchRecord>,
    summary: &mut ReplaySummary,
) -> Vec<(DateTime<Utc>, MatchRecord)> {
    let mut ordered: Vec<(DateTime<Utc>, MatchRecord)> = matches
        .into_iter()
        .map(|record| {
            let at = resolve_timestamp(record.timestamp.as_ref());
            if at == DateTime::UNIX_EPOCH {
                summary.undated += 1;
            }
            (at, record)
        })
        .collect();

    // Stable: equal timestamps keep their input order
    ordered.sort_by_key(|(at, _)| *at);
    ordered
}

fn outcome_of(record: &MatchRecord) -> MatchOutcome {
    if record.home.score > record.away.score {
        MatchOutcome::HomeWin
    } else if record.away.score > record.home.score {
        MatchOutcome::AwayWin
    } else {
        MatchOutcome::Tie
    }
}

fn annotation(ratings: &SideRatings, global_delta: f64, venue_delta: f64) -> SideAnnotation {
    SideAnnotation {
        old_global_rating: ratings.global,
        new_global_rating: ratings.global + global_delta,
        rating_delta: global_delta,
        old_venue_rating: ratings.venue,
        new_venue_rating: ratings.venue + venue_delta,
        venue_rating_delta: venue_delta,
    }
}

#[allow(clippy::too_many_arguments)]
/// `won` is `None` for a tie
fn commit_side(
    state: &mut ReplayState,
    participant_id: &str,
    name: &str,
    annotation: &SideAnnotation,
    (venue_id, at): (&str, DateTime<Utc>),
    won: Option<bool>,
) {
    let participant = state.participant_mut(participant_id);
    if !name.is_empty() {
        participant.name = name.to_string();
    }

    participant.global_rating = annotation.new_global_rating;
    participant
        .venue_ratings
        .insert(venue_id.to_string(), annotation.new_venue_rating);
    *participant.venue_matches.entry(venue_id.to_string()).or_insert(0) += 1;

    match won {
        Some(true) => participant.wins += 1,
        Some(false) => participant.losses += 1,
        None => {}
    }

    participant.rating_history.push(RatingPoint {
        timestamp: at,
        rating: annotation.new_global_rating,
    });
}
