use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{CreateTournamentRequest, FinishRoundResponse, ScoreRequest};
use crate::bracket::RoundTransition;
use crate::domain::parse_score;
use crate::services::tournament::TournamentService;
use super::{error_response, AppState};

pub async fn get_tournament(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<String>,
) -> impl IntoResponse {
    let service = TournamentService::new(state.gateway.as_ref(), &state.config);
    match service.load(&tournament_id) {
        Ok(bracket) => Json(bracket).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_round_robin_table(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<String>,
) -> impl IntoResponse {
    let service = TournamentService::new(state.gateway.as_ref(), &state.config);
    match service.load(&tournament_id) {
        Ok(bracket) => Json(bracket.round_robin_table()).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create_tournament(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTournamentRequest>,
) -> impl IntoResponse {
    let service = TournamentService::new(state.gateway.as_ref(), &state.config);
    match service.create(&request.tournament_id, request.venue_id, request.entrants) {
        Ok(bracket) => (StatusCode::CREATED, Json(bracket)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn record_score(
    State(state): State<Arc<AppState>>,
    Path((tournament_id, match_id)): Path<(String, String)>,
    Json(request): Json<ScoreRequest>,
) -> impl IntoResponse {
    let scores = parse_score("player1", &request.score_player1)
        .and_then(|s1| parse_score("player2", &request.score_player2).map(|s2| (s1, s2)));
    let (score_player1, score_player2) = match scores {
        Ok(scores) => scores,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let service = TournamentService::new(state.gateway.as_ref(), &state.config);
    match service.record_score(&tournament_id, &match_id, score_player1, score_player2) {
        Ok(bracket) => Json(bracket).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn finish_round(
    State(state): State<Arc<AppState>>,
    Path((tournament_id, round_index)): Path<(String, usize)>,
) -> impl IntoResponse {
    let service = TournamentService::new(state.gateway.as_ref(), &state.config);
    let (bracket, transition) = match service.finish_round(&tournament_id, round_index) {
        Ok(result) => result,
        Err(e) => return error_response(e),
    };

    let (transition, next_round_index) = match transition {
        RoundTransition::Seeded(idx) => ("seeded", Some(idx)),
        RoundTransition::Finished => ("finished", None),
        RoundTransition::Completed => ("completed", None),
    };

    Json(FinishRoundResponse {
        transition: transition.to_string(),
        next_round_index,
        bracket,
    })
    .into_response()
}
