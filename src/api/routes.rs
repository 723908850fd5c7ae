use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::admin_rebuild,
    matches::record_match,
    ratings::{get_head_to_head_comparison, get_participant_detail, get_ratings},
    seasons::{finalize_season, get_seasons},
    tournaments::{
        create_tournament, finish_round, get_round_robin_table, get_tournament, record_score,
    },
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/activities/:activity/ratings", get(get_ratings))
        .route(
            "/api/activities/:activity/participants/:participant_id",
            get(get_participant_detail),
        )
        .route(
            "/api/activities/:activity/compare/:participant1_id/:participant2_id",
            get(get_head_to_head_comparison),
        )
        .route("/api/matches", post(record_match))
        .route("/api/tournaments", post(create_tournament))
        .route("/api/tournaments/:tournament_id", get(get_tournament))
        .route("/api/tournaments/:tournament_id/table", get(get_round_robin_table))
        .route(
            "/api/tournaments/:tournament_id/matches/:match_id/score",
            post(record_score),
        )
        .route(
            "/api/tournaments/:tournament_id/rounds/:round_index/finish",
            post(finish_round),
        )
        .route("/api/venues/:venue_id/seasons", get(get_seasons).post(finalize_season))
        .route("/api/admin/rebuild/:activity", post(admin_rebuild))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::settings::AppConfig;
    use crate::gateway::MemoryGateway;

    fn app() -> Router {
        create_router(Arc::new(AppState {
            gateway: Arc::new(MemoryGateway::new()),
            config: AppConfig::new(),
        }))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn fetch(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, "GET", uri, None, None).await
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, "POST", uri, Some(body), None).await
    }

    fn match_body(id: &str, home: (&str, f64), away: (&str, f64)) -> Value {
        json!({
            "id": id,
            "activity": "pool",
            "timestamp": "2024-03-05T18:30:15Z",
            "venueId": "v1",
            "home": side(home, "home"),
            "away": side(away, "away")
        })
    }

    fn side((participant_id, score): (&str, f64), label: &str) -> Value {
        json!({
            "participantId": participant_id,
            "name": participant_id.to_uppercase(),
            "score": score,
            "side": label
        })
    }

    #[tokio::test]
    async fn test_record_match_and_read_ratings() {
        let app = app();

        let first = match_body("m1", ("a", 11.0), ("b", 5.0));
        let (status, body) = post_json(&app, "/api/matches", first.clone()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["home"]["annotation"]["ratingDelta"], json!(16.0));
        assert_eq!(body["away"]["annotation"]["venueRatingDelta"], json!(-13.0));
        assert_eq!(body["winnerName"], json!("A"));

        let (status, _) = post_json(&app, "/api/matches", first).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let negative = match_body("m2", ("a", -1.0), ("b", 5.0));
        let (status, _) = post_json(&app, "/api/matches", negative).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = fetch(&app, "/api/activities/pool/ratings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"][0]["participantId"], json!("a"));
        assert_eq!(body["items"][0]["rating"], json!(1016.0));
        assert_eq!(body["items"][1]["rating"], json!(984.0));

        let (_, body) = fetch(&app, "/api/activities/pool/ratings?venue=v1").await;
        assert_eq!(body["items"][1]["rating"], json!(987.0));

        let (status, body) = fetch(&app, "/api/activities/pool/compare/a/b").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["participant1Wins"], json!(1));

        let (status, _) = fetch(&app, "/api/activities/pool/participants/zed").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tournament_endpoints() {
        let app = app();
        let entrants = json!([
            {"participantId": "a", "name": "Ann"},
            {"participantId": "b", "name": "Bob"}
        ]);

        let request = json!({"tournamentId": "cup", "entrants": entrants});
        let (status, body) = post_json(&app, "/api/tournaments", request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["stage"], json!("roundRobin"));

        let finish_uri = "/api/tournaments/cup/rounds/0/finish";
        let (status, _) = send(&app, "POST", finish_uri, None, None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let score_uri = "/api/tournaments/cup/matches/r0-m1/score";
        let score = json!({"scorePlayer1": "abc", "scorePlayer2": 2});
        let (status, _) = post_json(&app, score_uri, score).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let score = json!({"scorePlayer1": "5", "scorePlayer2": 2});
        let (status, _) = post_json(&app, score_uri, score).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = fetch(&app, "/api/tournaments/cup/table").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["participantId"], json!("a"));

        let (status, _) = fetch(&app, "/api/tournaments/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_routes_require_token() {
        let app = app();

        let (status, _) = send(&app, "POST", "/api/venues/v1/seasons", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, "POST", "/api/venues/v1/seasons", None, Some("secret")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "POST", "/api/admin/rebuild/pool", None, Some("nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
