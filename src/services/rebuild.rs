use anyhow::{Context, Result};
use log::info;

use crate::config::settings::AppConfig;
use crate::config::VenueDirectory;
use crate::errors::store_context;
use crate::gateway::{Gateway, WriteOp};
use crate::replay::{HistoryReplayer, ReplaySummary};

/// What a rebuild wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub summary: ReplaySummary,
    pub participants: usize,
    pub batches: usize,
}

/// Recomputes every rating of an activity from its match log and persists
/// the result in bounded batches.
///
/// Each batch is atomic, the rebuild as a whole is not. Re-running after a
/// failure converges to the same state.
pub struct RebuildService<'a> {
    gateway: &'a dyn Gateway,
    config: &'a AppConfig,
}

impl<'a> RebuildService<'a> {
    pub fn new(gateway: &'a dyn Gateway, config: &'a AppConfig) -> Self {
        Self { gateway, config }
    }

    pub fn run(&self, activity: &str) -> Result<RebuildReport> {
        info!("=== Rebuilding ratings for {} ===", activity);

        let venues = self.load_venues()?;
        let matches = self
            .gateway
            .matches_for_activity(activity)
            .with_context(|| store_context("load matches of", activity))?;
        info!("  → Loaded {} matches and {} venue profiles", matches.len(), venues.len());

        if matches.is_empty() {
            info!("=== Nothing to rebuild ===");
            return Ok(RebuildReport::default());
        }

        let replayer = HistoryReplayer::new(
            self.config.rating.policy(),
            self.config.rating.starting_rating,
            &venues,
        );
        let outcome = replayer.rebuild(activity, matches);
        info!("  → Replayed {} matches: {}", outcome.summary.total(), outcome.summary);

        let participants = outcome.state.len();
        let ops = outcome
            .state
            .into_participants()
            .into_iter()
            .map(WriteOp::UpsertParticipant)
            .chain(outcome.matches.into_iter().map(WriteOp::UpsertMatch))
            .collect();
        let batches = commit_in_batches(self.gateway, ops, self.config.replay.batch_size)?;

        info!("=== Rebuild Complete ===");
        Ok(RebuildReport {
            summary: outcome.summary,
            participants,
            batches,
        })
    }

    fn load_venues(&self) -> Result<VenueDirectory> {
        let profiles = self.gateway.venues().context("Failed to load venue profiles")?;
        Ok(VenueDirectory::from_profiles(profiles, self.config.rating.default_venue_k))
    }
}

/// Commits `ops` in chunks of at most `batch_size` writes. Returns the
/// number of batches committed.
pub fn commit_in_batches(
    gateway: &dyn Gateway,
    ops: Vec<WriteOp>,
    batch_size: usize,
) -> Result<usize> {
    let batch_size = batch_size.max(1);
    let total = ops.len();
    let mut written = 0;
    let mut batches = 0;

    let mut pending = ops.into_iter().peekable();
    while pending.peek().is_some() {
        let batch: Vec<WriteOp> = pending.by_ref().take(batch_size).collect();
        let size = batch.len();

        gateway.commit_batch(batch).with_context(|| {
            format!("Batch {} failed after {} of {} writes", batches + 1, written, total)
        })?;

        written += size;
        batches += 1;
        info!("  → Committed batch {} ({}/{} writes)", batches, written, total);
    }

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VenueProfile;
    use crate::gateway::MemoryGateway;
    use crate::rating::CompetitiveMode;

    fn venue(id: &str) -> WriteOp {
        WriteOp::UpsertVenue(VenueProfile {
            id: id.to_string(),
            name: id.to_uppercase(),
            mode: CompetitiveMode::Office,
            k_factor: None,
        })
    }

    #[test]
    fn test_commit_in_batches() {
        let gateway = MemoryGateway::new();
        let ops = (0..5).map(|i| venue(&format!("v{i}"))).collect();

        let batches = commit_in_batches(&gateway, ops, 2).unwrap();

        assert_eq!(batches, 3);
        assert_eq!(gateway.commit_count(), 3);
        assert_eq!(gateway.venues().unwrap().len(), 5);
    }

    #[test]
    fn test_empty_activity_writes_nothing() {
        let gateway = MemoryGateway::new();
        let config = AppConfig::new();

        let report = RebuildService::new(&gateway, &config).run("chess").unwrap();

        assert_eq!(report, RebuildReport::default());
        assert_eq!(gateway.commit_count(), 0);
    }
}
