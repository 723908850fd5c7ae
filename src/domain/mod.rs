pub mod models;
pub mod timestamps;
pub mod validation;

pub use models::*;
pub use timestamps::{parse_timestamp, resolve_timestamp, RawTimestamp};
pub use validation::{parse_score, validate_match, validate_score};
