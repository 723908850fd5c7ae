//! Record store boundary. Engines never touch storage directly; services
//! read snapshots through a [`Gateway`] and hand back [`WriteOp`] batches.

mod memory;

pub use memory::MemoryGateway;

use anyhow::Result;

use crate::bracket::Bracket;
use crate::domain::{MatchRecord, ParticipantState, VenueProfile};
use crate::season::{Achievement, SeasonRecord};

/// A single document write
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    UpsertMatch(MatchRecord),
    UpsertParticipant(ParticipantState),
    UpsertVenue(VenueProfile),
    UpsertBracket(Bracket),
    /// Appends to the venue's season history and to the achievement log of
    /// every participant in the record
    AppendSeason(SeasonRecord),
}

impl WriteOp {
    pub fn kind(&self) -> &'static str {
        match self {
            WriteOp::UpsertMatch(_) => "match",
            WriteOp::UpsertParticipant(_) => "participant",
            WriteOp::UpsertVenue(_) => "venue",
            WriteOp::UpsertBracket(_) => "bracket",
            WriteOp::AppendSeason(_) => "season",
        }
    }
}

pub trait Gateway: Send + Sync {
    /// Every match of an activity, in no particular order
    fn matches_for_activity(&self, activity: &str) -> Result<Vec<MatchRecord>>;

    /// Every match played at a venue, in no particular order
    fn matches_for_venue(&self, venue_id: &str) -> Result<Vec<MatchRecord>>;

    fn find_match(&self, match_id: &str) -> Result<Option<MatchRecord>>;

    fn participant(&self, activity: &str, participant_id: &str) -> Result<Option<ParticipantState>>;

    fn participants_for_activity(&self, activity: &str) -> Result<Vec<ParticipantState>>;

    fn venues(&self) -> Result<Vec<VenueProfile>>;

    fn bracket(&self, tournament_id: &str) -> Result<Option<Bracket>>;

    /// Closed seasons of a venue, oldest first
    fn seasons(&self, venue_id: &str) -> Result<Vec<SeasonRecord>>;

    fn achievements(&self, participant_id: &str) -> Result<Vec<Achievement>>;

    /// Applies all writes or none of them
    fn commit_batch(&self, ops: Vec<WriteOp>) -> Result<()>;
}
