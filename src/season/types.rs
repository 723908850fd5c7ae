use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rating::{ParticipantId, VenueId};

/// One participant's line in a closed season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRow {
    pub participant_id: ParticipantId,
    #[serde(default)]
    pub name: String,
    pub place: usize,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub total_added_points: f64,
    pub final_score: f64,
    pub longest_win_streak: u32,
}

/// Ranked result of a venue season; never modified once stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRecord {
    pub venue_id: VenueId,
    pub season_index: u32,
    pub closed_at: DateTime<Utc>,
    pub average_matches_played: f64,
    pub rows: Vec<SeasonRow>,
    /// Matches counted in this season
    #[serde(default)]
    pub match_ids: Vec<String>,
}

impl SeasonRecord {
    pub fn row(&self, participant_id: &str) -> Option<&SeasonRow> {
        self.rows.iter().find(|r| r.participant_id == participant_id)
    }

    pub fn achievements(&self) -> impl Iterator<Item = (&str, Achievement)> + '_ {
        self.rows.iter().map(move |row| {
            (
                row.participant_id.as_str(),
                Achievement {
                    venue_id: self.venue_id.clone(),
                    season_index: self.season_index,
                    place: row.place,
                    final_score: row.final_score,
                    closed_at: self.closed_at,
                },
            )
        })
    }
}

/// Entry in a participant's personal season log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub venue_id: VenueId,
    pub season_index: u32,
    pub place: usize,
    pub final_score: f64,
    pub closed_at: DateTime<Utc>,
}
