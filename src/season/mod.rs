pub mod finalizer;
mod streaks;
pub mod types;

pub use finalizer::{composite_score, finalize_season, SeasonClosing};
pub use streaks::longest_win_streak;
pub use types::{Achievement, SeasonRecord, SeasonRow};
