use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::domain::MatchRecord;
use crate::services::recording::RecordingService;
use super::{error_response, AppState};

pub async fn record_match(
    State(state): State<Arc<AppState>>,
    Json(record): Json<MatchRecord>,
) -> impl IntoResponse {
    let service = RecordingService::new(state.gateway.as_ref(), &state.config);
    match service.record_match(record) {
        Ok(annotated) => (StatusCode::CREATED, Json(annotated)).into_response(),
        Err(e) => error_response(e),
    }
}
