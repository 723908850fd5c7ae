use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::config::settings::AppConfig;
use crate::domain::{resolve_timestamp, MatchRecord};
use crate::errors::store_context;
use crate::gateway::{Gateway, WriteOp};
use crate::rating::{ParticipantId, RatingValue};
use crate::season::{finalize_season, SeasonClosing, SeasonRecord};

/// Closes venue seasons and appends them to the store.
pub struct SeasonService<'a> {
    gateway: &'a dyn Gateway,
    config: &'a AppConfig,
}

impl<'a> SeasonService<'a> {
    pub fn new(gateway: &'a dyn Gateway, config: &'a AppConfig) -> Self {
        Self { gateway, config }
    }

    /// Closes the running season of `venue_id` at `closed_at`.
    ///
    /// The running season holds the venue matches no earlier season counted,
    /// whatever their timestamp. Returns `None` and writes nothing when it is
    /// empty.
    pub fn finalize(
        &self,
        venue_id: &str,
        closed_at: DateTime<Utc>,
    ) -> Result<Option<SeasonRecord>> {
        info!("=== Finalizing season of venue {} ===", venue_id);

        let history = self
            .gateway
            .seasons(venue_id)
            .with_context(|| store_context("load seasons of", venue_id))?;
        let covered: HashSet<&str> = history
            .iter()
            .flat_map(|s| s.match_ids.iter().map(String::as_str))
            .collect();
        let matches: Vec<MatchRecord> = self
            .gateway
            .matches_for_venue(venue_id)
            .with_context(|| store_context("load matches of", venue_id))?
            .into_iter()
            .filter(|m| !covered.contains(m.id.as_str()) && in_running_season(m, history.last()))
            .collect();
        info!("  → {} matches since the last closing", matches.len());

        let ratings = self.current_ratings(venue_id, &matches)?;
        let closing = SeasonClosing {
            venue_id,
            season_index: history.len() as u32 + 1,
            closed_at,
            ratings: &ratings,
        };

        let Some(record) = finalize_season(&closing, &matches, &self.config.season) else {
            info!("=== Nothing to finalize ===");
            return Ok(None);
        };

        self.gateway
            .commit_batch(vec![WriteOp::AppendSeason(record.clone())])
            .with_context(|| store_context("append season to", venue_id))?;

        info!(
            "=== Season {} closed, winner: {} ===",
            record.season_index,
            record.rows.first().map(|r| r.name.as_str()).unwrap_or("-")
        );
        Ok(Some(record))
    }

    /// Stored venue rating of every participant seen in `matches`
    fn current_ratings(
        &self,
        venue_id: &str,
        matches: &[MatchRecord],
    ) -> Result<BTreeMap<ParticipantId, RatingValue>> {
        let mut ratings = BTreeMap::new();

        for record in matches {
            for side in [&record.home, &record.away] {
                let Some(participant_id) = side.participant_id.as_deref() else {
                    continue;
                };
                if ratings.contains_key(participant_id) {
                    continue;
                }
                if let Some(state) = self.gateway.participant(&record.activity, participant_id)? {
                    if let Some(rating) = state.venue_ratings.get(venue_id) {
                        ratings.insert(participant_id.to_string(), *rating);
                    }
                }
            }
        }

        Ok(ratings)
    }
}

/// Called for matches no earlier season counted. A season stored without
/// match ids falls back to its closing time.
fn in_running_season(record: &MatchRecord, previous: Option<&SeasonRecord>) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    let played_at = resolve_timestamp(record.timestamp.as_ref());
    if played_at > previous.closed_at {
        return true;
    }

    if previous.match_ids.is_empty() {
        warn!(
            "Match {} is dated before season {} closed and is left out",
            record.id, previous.season_index
        );
        return false;
    }
    warn!(
        "Match {} is dated before season {} closed, counting it in the running season",
        record.id, previous.season_index
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchSide, RawTimestamp, Side};
    use chrono::TimeZone;

    fn played_on(day: u32) -> MatchRecord {
        let when = Utc.with_ymd_and_hms(2024, 3, day, 20, 0, 0).unwrap();
        MatchRecord {
            id: format!("m{day}"),
            activity: "pool".to_string(),
            timestamp: Some(RawTimestamp::from_datetime(when)),
            venue_id: Some("v1".to_string()),
            home: MatchSide::new("a", "Ann", 3.0, Side::Home),
            away: MatchSide::new("b", "Bob", 1.0, Side::Away),
            is_ranked: None,
            winner_name: None,
            winner_id: None,
        }
    }

    fn closed_on(day: u32, match_ids: &[&str]) -> SeasonRecord {
        SeasonRecord {
            venue_id: "v1".to_string(),
            season_index: 1,
            closed_at: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            average_matches_played: 0.0,
            rows: Vec::new(),
            match_ids: match_ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    #[test]
    fn test_running_season_membership() {
        assert!(in_running_season(&played_on(5), None));

        let tracked = closed_on(10, &["m1"]);
        assert!(in_running_season(&played_on(12), Some(&tracked)));
        assert!(in_running_season(&played_on(5), Some(&tracked)));

        // seasons stored without match ids only know their closing time
        let untracked = closed_on(10, &[]);
        assert!(in_running_season(&played_on(12), Some(&untracked)));
        assert!(!in_running_season(&played_on(5), Some(&untracked)));
    }
}
