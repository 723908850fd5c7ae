use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rating::{CompetitiveMode, ParticipantId, RatingValue, VenueId};

use super::timestamps::RawTimestamp;

/// Which slot of a match a participant occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Home,
    Away,
}

/// Rating fields written onto a side once the match has been processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideAnnotation {
    pub old_global_rating: RatingValue,
    pub new_global_rating: RatingValue,
    pub rating_delta: f64,
    pub old_venue_rating: RatingValue,
    pub new_venue_rating: RatingValue,
    pub venue_rating_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSide {
    #[serde(default)]
    pub participant_id: Option<ParticipantId>,
    #[serde(default)]
    pub name: String,
    pub score: f64,
    pub side: Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<SideAnnotation>,
}

impl MatchSide {
    pub fn new(participant_id: &str, name: &str, score: f64, side: Side) -> Self {
        Self {
            participant_id: Some(participant_id.to_string()),
            name: name.to_string(),
            score,
            side,
            annotation: None,
        }
    }
}

/// A single recorded match between two participants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,
    #[serde(default)]
    pub venue_id: Option<VenueId>,
    pub home: MatchSide,
    pub away: MatchSide,
    #[serde(default)]
    pub is_ranked: Option<bool>,
    #[serde(default)]
    pub winner_name: Option<String>,
    #[serde(default)]
    pub winner_id: Option<ParticipantId>,
}

impl MatchRecord {
    /// Only an explicit `false` opts a match out of rating changes
    pub fn is_ranked(&self) -> bool {
        self.is_ranked != Some(false)
    }

    pub fn is_tie(&self) -> bool {
        self.home.score == self.away.score
    }

    /// Participant and venue ids required to process the match
    pub fn identifiers(&self) -> Option<(&str, &str, &str)> {
        let home = self.home.participant_id.as_deref().filter(|s| !s.is_empty())?;
        let away = self.away.participant_id.as_deref().filter(|s| !s.is_empty())?;
        let venue = self.venue_id.as_deref().filter(|s| !s.is_empty())?;
        Some((home, away, venue))
    }

    pub fn winning_side(&self) -> Option<&MatchSide> {
        if self.home.score > self.away.score {
            Some(&self.home)
        } else if self.away.score > self.home.score {
            Some(&self.away)
        } else {
            None
        }
    }

    pub fn involves(&self, participant_id: &str) -> bool {
        self.home.participant_id.as_deref() == Some(participant_id)
            || self.away.participant_id.as_deref() == Some(participant_id)
    }
}

/// One point on a participant's rating timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingPoint {
    pub timestamp: DateTime<Utc>,
    pub rating: RatingValue,
}

/// Per-activity rating and statistics of one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantState {
    pub participant_id: ParticipantId,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub name: String,
    pub global_rating: RatingValue,
    #[serde(default)]
    pub venue_ratings: BTreeMap<VenueId, RatingValue>,
    #[serde(default)]
    pub venue_matches: BTreeMap<VenueId, u32>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub rating_history: Vec<RatingPoint>,
}

impl ParticipantState {
    pub fn new(participant_id: &str, activity: &str, starting_rating: RatingValue) -> Self {
        Self {
            participant_id: participant_id.to_string(),
            activity: activity.to_string(),
            name: String::new(),
            global_rating: starting_rating,
            venue_ratings: BTreeMap::new(),
            venue_matches: BTreeMap::new(),
            wins: 0,
            losses: 0,
            rating_history: Vec::new(),
        }
    }

    pub fn venue_rating(&self, venue_id: &str, starting_rating: RatingValue) -> RatingValue {
        self.venue_ratings.get(venue_id).copied().unwrap_or(starting_rating)
    }

    pub fn matches_at(&self, venue_id: &str) -> u32 {
        self.venue_matches.get(venue_id).copied().unwrap_or(0)
    }

    pub fn matches_played(&self) -> u32 {
        self.venue_matches.values().sum()
    }
}

/// Venue ("room") settings relevant to local ratings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueProfile {
    pub id: VenueId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mode: CompetitiveMode,
    #[serde(default)]
    pub k_factor: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match() -> MatchRecord {
        MatchRecord {
            id: "m1".to_string(),
            activity: "pool".to_string(),
            timestamp: None,
            venue_id: Some("v1".to_string()),
            home: MatchSide::new("a", "Ann", 5.0, Side::Home),
            away: MatchSide::new("b", "Bob", 3.0, Side::Away),
            is_ranked: None,
            winner_name: None,
            winner_id: None,
        }
    }

    #[test]
    fn test_ranked_unless_explicitly_false() {
        let mut record = sample_match();
        assert!(record.is_ranked());
        record.is_ranked = Some(true);
        assert!(record.is_ranked());
        record.is_ranked = Some(false);
        assert!(!record.is_ranked());
    }

    #[test]
    fn test_identifiers_require_venue() {
        let mut record = sample_match();
        assert_eq!(record.identifiers(), Some(("a", "b", "v1")));
        record.venue_id = Some(String::new());
        assert_eq!(record.identifiers(), None);
    }

    #[test]
    fn test_deserialize_document() {
        let json = r#"{
            "id": "m9",
            "timestamp": "05.03.2024 18.30.00",
            "venueId": "v1",
            "home": {"participantId": "a", "name": "Ann", "score": 11, "side": "home"},
            "away": {"participantId": "b", "name": "Bob", "score": 5, "side": "away"}
        }"#;
        let record: MatchRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_ranked());
        assert_eq!(record.winning_side().map(|s| s.name.as_str()), Some("Ann"));
    }
}
