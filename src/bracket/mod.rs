pub mod engine;
pub mod seeding;
pub mod standings;
pub mod types;

pub use engine::{can_finish_round, RoundTransition, ScoreError};
pub use standings::{compute_round_robin_table, TableRow};
pub use types::{
    Bracket, BracketMatch, BracketStage, Entrant, MatchStatus, Round, RoundStatus, RoundType,
    TournamentStanding,
};
