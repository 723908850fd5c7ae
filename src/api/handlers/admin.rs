use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::services::rebuild::RebuildService;
use super::{is_authorized, AppState};

pub async fn admin_rebuild(
    State(state): State<Arc<AppState>>,
    Path(activity): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !is_authorized(&headers, &state.config) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let task_activity = activity.clone();
    tokio::task::spawn_blocking(move || {
        log::info!("Admin triggered rebuild of {} started", task_activity);
        let service = RebuildService::new(state.gateway.as_ref(), &state.config);
        match service.run(&task_activity) {
            Ok(report) => log::info!(
                "Admin triggered rebuild of {} completed: {} participants in {} batches",
                task_activity,
                report.participants,
                report.batches
            ),
            Err(e) => log::error!("Rebuild of {} failed: {:?}", task_activity, e),
        }
    });

    (StatusCode::ACCEPTED, format!("Rebuild of {} triggered", activity)).into_response()
}
