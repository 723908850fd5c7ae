use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::info;

use crate::config::settings::AppConfig;
use crate::config::VenueDirectory;
use crate::domain::{resolve_timestamp, validate_match, MatchRecord, ParticipantState, RawTimestamp};
use crate::errors::AlreadyExists;
use crate::gateway::{Gateway, WriteOp};
use crate::replay::{HistoryReplayer, ReplayState};

/// Rates a single newly played match against the stored participant states.
pub struct RecordingService<'a> {
    gateway: &'a dyn Gateway,
    config: &'a AppConfig,
}

impl<'a> RecordingService<'a> {
    pub fn new(gateway: &'a dyn Gateway, config: &'a AppConfig) -> Self {
        Self { gateway, config }
    }

    /// Validates, rates, annotates and stores `record` together with both
    /// participants in one batch. Returns the annotated record.
    pub fn record_match(&self, mut record: MatchRecord) -> Result<MatchRecord> {
        validate_match(&record)?;
        if self.gateway.find_match(&record.id)?.is_some() {
            return Err(AlreadyExists::new("match", &record.id).into());
        }
        if record.timestamp.is_none() {
            record.timestamp = Some(RawTimestamp::from_datetime(Utc::now()));
        }

        let mut state = self.load_state(&record)?;
        let venues = VenueDirectory::from_profiles(
            self.gateway.venues().context("Failed to load venue profiles")?,
            self.config.rating.default_venue_k,
        );
        let replayer = HistoryReplayer::new(
            self.config.rating.policy(),
            self.config.rating.starting_rating,
            &venues,
        );

        let at = resolve_timestamp(record.timestamp.as_ref());
        let Some(outcome) = replayer.apply_match(&mut state, &mut record, at) else {
            bail!("Match {} is missing a participant or venue id", record.id);
        };

        let mut ops = vec![WriteOp::UpsertMatch(record.clone())];
        ops.extend(state.into_participants().into_iter().map(WriteOp::UpsertParticipant));
        self.gateway
            .commit_batch(ops)
            .with_context(|| format!("Failed to store match {}", record.id))?;

        info!("Recorded match {} ({:?})", record.id, outcome);
        Ok(record)
    }

    fn load_state(&self, record: &MatchRecord) -> Result<ReplayState> {
        let starting_rating = self.config.rating.starting_rating;
        let mut participants = Vec::with_capacity(2);

        for side in [&record.home, &record.away] {
            let Some(participant_id) = side.participant_id.as_deref() else {
                continue;
            };
            let state = self
                .gateway
                .participant(&record.activity, participant_id)?
                .unwrap_or_else(|| {
                    ParticipantState::new(participant_id, &record.activity, starting_rating)
                });
            participants.push(state);
        }

        Ok(ReplayState::from_participants(&record.activity, starting_rating, participants))
    }
}
