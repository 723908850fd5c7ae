use serde::{Deserialize, Serialize};

use crate::bracket::{Bracket, Entrant};
use crate::domain::{MatchRecord, ParticipantState};
use crate::season::Achievement;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingListItem {
    pub rank: usize,
    pub participant_id: String,
    pub name: String,
    pub rating: f64,
    pub wins: u32,
    pub losses: u32,
    pub matches_played: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingListResponse {
    pub activity: String,
    /// Set when the list ranks venue ratings instead of global ones
    pub venue_id: Option<String>,
    pub items: Vec<RatingListItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetail {
    #[serde(flatten)]
    pub state: ParticipantState,
    pub achievements: Vec<Achievement>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadStats {
    pub total_matches: u32,
    pub participant1_wins: u32,
    pub participant2_wins: u32,
    pub ties: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadResponse {
    pub participant1: ParticipantState,
    pub participant2: ParticipantState,
    /// Chance that participant 1 wins, from the global ratings
    pub probability_participant1_wins: f64,
    pub stats: HeadToHeadStats,
    pub matches: Vec<MatchRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTournamentRequest {
    pub tournament_id: String,
    pub venue_id: Option<String>,
    pub entrants: Vec<Entrant>,
}

/// Scores arrive as numbers or numeric strings
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub score_player1: serde_json::Value,
    pub score_player2: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishRoundResponse {
    /// `seeded`, `finished` or `completed`
    pub transition: String,
    /// Index of the round seeded by this transition, if any
    pub next_round_index: Option<usize>,
    pub bracket: Bracket,
}
