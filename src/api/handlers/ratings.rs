use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{
    HeadToHeadResponse, HeadToHeadStats, ParticipantDetail, RatingListItem, RatingListResponse,
};
use crate::domain::{resolve_timestamp, ParticipantState};
use crate::rating::expected_score;
use super::{error_response, AppState, RatingParams};

pub async fn get_ratings(
    State(state): State<Arc<AppState>>,
    Path(activity): Path<String>,
    Query(params): Query<RatingParams>,
) -> impl IntoResponse {
    let participants = match state.gateway.participants_for_activity(&activity) {
        Ok(participants) => participants,
        Err(e) => return error_response(e),
    };

    let starting_rating = state.config.rating.starting_rating;
    let mut rows: Vec<(f64, ParticipantState)> = participants
        .into_iter()
        .filter_map(|p| match params.venue.as_deref() {
            // only participants who played at the venue
            Some(venue) => p
                .venue_ratings
                .contains_key(venue)
                .then(|| (p.venue_rating(venue, starting_rating), p)),
            None => Some((p.global_rating, p)),
        })
        .collect();
    rows.sort_by(|(a, pa), (b, pb)| {
        b.total_cmp(a)
            .then_with(|| pa.participant_id.cmp(&pb.participant_id))
    });

    let limit = params.limit.unwrap_or(rows.len());
    let items = rows
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (rating, p))| RatingListItem {
            rank: i + 1,
            matches_played: p.matches_played(),
            participant_id: p.participant_id,
            name: p.name,
            rating,
            wins: p.wins,
            losses: p.losses,
        })
        .collect();

    Json(RatingListResponse {
        activity,
        venue_id: params.venue,
        items,
    })
    .into_response()
}

pub async fn get_participant_detail(
    State(state): State<Arc<AppState>>,
    Path((activity, participant_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let participant = match state.gateway.participant(&activity, &participant_id) {
        Ok(Some(p)) => p,
        Ok(None) => {
            let message = format!("Participant {} not found", participant_id);
            return (StatusCode::NOT_FOUND, message).into_response();
        }
        Err(e) => return error_response(e),
    };

    let achievements = match state.gateway.achievements(&participant_id) {
        Ok(achievements) => achievements,
        Err(e) => return error_response(e),
    };

    Json(ParticipantDetail {
        state: participant,
        achievements,
    })
    .into_response()
}

pub async fn get_head_to_head_comparison(
    State(state): State<Arc<AppState>>,
    Path((activity, participant1_id, participant2_id)): Path<(String, String, String)>,
) -> impl IntoResponse {
    let participant1 = match state.gateway.participant(&activity, &participant1_id) {
        Ok(Some(p)) => p,
        Ok(None) => {
            let message = format!("Participant 1 ({}) not found", participant1_id);
            return (StatusCode::NOT_FOUND, message).into_response();
        }
        Err(e) => return error_response(e),
    };
    let participant2 = match state.gateway.participant(&activity, &participant2_id) {
        Ok(Some(p)) => p,
        Ok(None) => {
            let message = format!("Participant 2 ({}) not found", participant2_id);
            return (StatusCode::NOT_FOUND, message).into_response();
        }
        Err(e) => return error_response(e),
    };

    let mut matches: Vec<_> = match state.gateway.matches_for_activity(&activity) {
        Ok(matches) => matches
            .into_iter()
            .filter(|m| m.involves(&participant1_id) && m.involves(&participant2_id))
            .collect(),
        Err(e) => return error_response(e),
    };
    matches.sort_by_key(|m| std::cmp::Reverse(resolve_timestamp(m.timestamp.as_ref())));

    let mut stats = HeadToHeadStats {
        total_matches: matches.len() as u32,
        participant1_wins: 0,
        participant2_wins: 0,
        ties: 0,
    };
    for m in &matches {
        match m.winning_side().and_then(|s| s.participant_id.as_deref()) {
            Some(id) if id == participant1_id => stats.participant1_wins += 1,
            Some(_) => stats.participant2_wins += 1,
            None => stats.ties += 1,
        }
    }

    let probability_participant1_wins =
        expected_score(participant1.global_rating, participant2.global_rating);

    Json(HeadToHeadResponse {
        participant1,
        participant2,
        probability_participant1_wins,
        stats,
        matches,
    })
    .into_response()
}
