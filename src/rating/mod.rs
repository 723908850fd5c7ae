pub mod elo;
pub mod types;

pub use elo::{
    compute_delta, compute_delta_with, dynamic_k, dynamic_k_with, expected_score, RatingDelta,
};
pub use types::{
    CompetitiveMode, ParticipantId, RatingPolicy, RatingScope, RatingValue, VenueId,
    DEFAULT_K_FACTOR, STARTING_RATING,
};
