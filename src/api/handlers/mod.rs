use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

use crate::bracket::ScoreError;
use crate::config::settings::AppConfig;
use crate::errors::{AlreadyExists, BracketError, NotFound, ValidationError};
use crate::gateway::Gateway;

pub mod admin;
pub mod matches;
pub mod ratings;
pub mod seasons;
pub mod tournaments;

pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub config: AppConfig,
}

#[derive(Deserialize)]
pub struct RatingParams {
    /// Rank by this venue's ratings instead of the global ones
    pub venue: Option<String>,
    pub limit: Option<usize>,
}

pub(crate) fn is_authorized(headers: &HeaderMap, config: &AppConfig) -> bool {
    let expected = format!("Bearer {}", config.storage.admin_token);
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|value| value == expected)
}

pub(crate) fn error_response(error: anyhow::Error) -> Response {
    let status = status_for(&error);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        log::error!("Request failed: {:?}", error);
    }
    (status, format!("{:#}", error)).into_response()
}

fn status_for(error: &anyhow::Error) -> StatusCode {
    if error.is::<NotFound>() {
        StatusCode::NOT_FOUND
    } else if error.is::<AlreadyExists>() {
        StatusCode::CONFLICT
    } else if error.is::<ValidationError>() {
        StatusCode::BAD_REQUEST
    } else if let Some(e) = error.downcast_ref::<ScoreError>() {
        match e {
            ScoreError::Validation(_) => StatusCode::BAD_REQUEST,
            ScoreError::Bracket(b) => bracket_status(b),
        }
    } else if let Some(e) = error.downcast_ref::<BracketError>() {
        bracket_status(e)
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn bracket_status(error: &BracketError) -> StatusCode {
    match error {
        BracketError::UnknownMatch(_) | BracketError::UnknownRound(_) => StatusCode::NOT_FOUND,
        BracketError::NotEnoughParticipants { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::CONFLICT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        assert_eq!(status_for(&NotFound::new("tournament", "x").into()), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&AlreadyExists::new("match", "m").into()), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&ScoreError::from(BracketError::AlreadyCompleted).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&BracketError::UnknownRound(4).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&anyhow::anyhow!("disk on fire")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_admin_token_check() {
        let config = AppConfig::new();
        let mut headers = HeaderMap::new();
        assert!(!is_authorized(&headers, &config));

        headers.insert("Authorization", "Bearer wrong".parse().unwrap());
        assert!(!is_authorized(&headers, &config));

        headers.insert("Authorization", "Bearer secret".parse().unwrap());
        assert!(is_authorized(&headers, &config));
    }
}
