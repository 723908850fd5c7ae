use thiserror::Error;

/// Rejected input, surfaced before any rating is computed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("score for {side} is not a number: {value}")]
    NonNumericScore { side: String, value: String },
    #[error("score for {side} must be a finite, non-negative number, got {value}")]
    InvalidScore { side: String, value: f64 },
    #[error("match {0} is missing a participant or venue id")]
    MissingIdentifiers(String),
    #[error("participant {0} cannot play against themselves")]
    SameParticipant(String),
}

/// Illegal bracket transition
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BracketError {
    #[error("a bracket needs at least {required} participants, got {actual}")]
    NotEnoughParticipants { required: usize, actual: usize },
    #[error("match {0} does not exist in the current round")]
    UnknownMatch(String),
    #[error("round {0} does not exist")]
    UnknownRound(usize),
    #[error("round {0} still has matches without both scores")]
    RoundIncomplete(usize),
    #[error("round {0} is already finished")]
    RoundAlreadyFinished(usize),
    #[error("tournament is already completed")]
    AlreadyCompleted,
}

/// Lookup of a document that is not in the store
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} {id} not found")]
pub struct NotFound {
    pub kind: &'static str,
    pub id: String,
}

impl NotFound {
    pub fn new(kind: &'static str, id: &str) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }
}

/// Attempt to create a document under an id that is taken
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} {id} already exists")]
pub struct AlreadyExists {
    pub kind: &'static str,
    pub id: String,
}

impl AlreadyExists {
    pub fn new(kind: &'static str, id: &str) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }
}

/// Add context to store errors
pub fn store_context(operation: &str, key: &str) -> String {
    format!("Failed to {} document: {}", operation, key)
}
