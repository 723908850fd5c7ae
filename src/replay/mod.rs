pub mod replayer;
pub mod state;
mod summary;

pub use replayer::{HistoryReplayer, MatchOutcome, ReplayOutcome};
pub use state::ReplayState;
pub use summary::ReplaySummary;
