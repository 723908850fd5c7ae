use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use std::sync::Arc;

use crate::services::season::SeasonService;
use super::{error_response, is_authorized, AppState};

pub async fn get_seasons(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
) -> impl IntoResponse {
    match state.gateway.seasons(&venue_id) {
        Ok(seasons) => Json(seasons).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn finalize_season(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !is_authorized(&headers, &state.config) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let service = SeasonService::new(state.gateway.as_ref(), &state.config);
    match service.finalize(&venue_id, Utc::now()) {
        Ok(Some(record)) => (StatusCode::CREATED, Json(record)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
