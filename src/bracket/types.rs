use serde::{Deserialize, Serialize};

use crate::rating::{ParticipantId, VenueId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BracketStage {
    RoundRobin,
    Knockout,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundType {
    RoundRobin,
    KnockoutQuarters,
    KnockoutSemis,
    KnockoutFinal,
    KnockoutBronze,
}

impl RoundType {
    /// Knockout round holding `matches` pairings
    pub fn for_knockout(matches: usize) -> Self {
        match matches {
            0 | 1 => RoundType::KnockoutFinal,
            2 => RoundType::KnockoutSemis,
            _ => RoundType::KnockoutQuarters,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundType::KnockoutFinal | RoundType::KnockoutBronze)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundStatus {
    NotStarted,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStatus {
    NotStarted,
    Finished,
}

/// A participant occupying a bracket slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entrant {
    pub participant_id: ParticipantId,
    #[serde(default)]
    pub name: String,
    /// Round-robin rank, shown next to the name in later rounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl Entrant {
    pub fn new(participant_id: &str, name: &str) -> Self {
        Self {
            participant_id: participant_id.to_string(),
            name: name.to_string(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketMatch {
    pub match_id: String,
    pub player1: Option<Entrant>,
    pub player2: Option<Entrant>,
    pub score_player1: Option<f64>,
    pub score_player2: Option<f64>,
    pub match_status: MatchStatus,
    pub winner_id: Option<ParticipantId>,
}

impl BracketMatch {
    pub fn new(match_id: String, player1: Option<Entrant>, player2: Option<Entrant>) -> Self {
        Self {
            match_id,
            player1,
            player2,
            score_player1: None,
            score_player2: None,
            match_status: MatchStatus::NotStarted,
            winner_id: None,
        }
    }

    pub fn has_scores(&self) -> bool {
        self.score_player1.is_some() && self.score_player2.is_some()
    }

    /// Fewer than two known entrants; never played
    pub fn is_bye(&self) -> bool {
        self.player1.is_none() || self.player2.is_none()
    }

    /// Lone entrant of a bye
    pub fn bye_entrant(&self) -> Option<&Entrant> {
        match (&self.player1, &self.player2) {
            (Some(p), None) | (None, Some(p)) => Some(p),
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<&Entrant> {
        let winner_id = self.winner_id.as_deref()?;
        [&self.player1, &self.player2]
            .into_iter()
            .flatten()
            .find(|e| e.participant_id == winner_id)
    }

    /// Beaten entrant of a played match
    pub fn loser(&self) -> Option<&Entrant> {
        let winner_id = self.winner_id.as_deref()?;
        if self.is_bye() {
            return None;
        }
        [&self.player1, &self.player2]
            .into_iter()
            .flatten()
            .find(|e| e.participant_id != winner_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub round_index: usize,
    #[serde(rename = "type")]
    pub round_type: RoundType,
    pub status: RoundStatus,
    pub matches: Vec<BracketMatch>,
}

/// Knockout shape fixed when the tournament starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketFormat {
    pub knockout_size: usize,
    pub bronze_match: bool,
}

/// Final row of a completed tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentStanding {
    pub participant_id: ParticipantId,
    pub name: String,
    pub place: usize,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_for: f64,
    pub points_against: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub tournament_id: String,
    #[serde(default)]
    pub venue_id: Option<VenueId>,
    pub stage: BracketStage,
    pub current_round_index: usize,
    pub format: BracketFormat,
    pub entrants: Vec<Entrant>,
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub standings: Vec<TournamentStanding>,
}

impl Bracket {
    pub fn is_completed(&self) -> bool {
        self.stage == BracketStage::Completed
    }

    pub fn round(&self, index: usize) -> Option<&Round> {
        self.rounds.iter().find(|r| r.round_index == index)
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.round(self.current_round_index)
    }
}
