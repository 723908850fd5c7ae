use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ParticipantState;
use crate::rating::{ParticipantId, RatingValue, VenueId};

/// Rating state of every participant in one activity.
///
/// Owned by a single replay; independent activities get independent states.
/// Ordered maps keep serialised output stable between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayState {
    activity: String,
    starting_rating: RatingValue,
    participants: BTreeMap<ParticipantId, ParticipantState>,
}

impl ReplayState {
    pub fn new(activity: &str, starting_rating: RatingValue) -> Self {
        Self {
            activity: activity.to_string(),
            starting_rating,
            participants: BTreeMap::new(),
        }
    }

    /// Continue from previously persisted participant states
    pub fn from_participants(
        activity: &str,
        starting_rating: RatingValue,
        participants: Vec<ParticipantState>,
    ) -> Self {
        let mut state = Self::new(activity, starting_rating);
        for participant in participants {
            state
                .participants
                .insert(participant.participant_id.clone(), participant);
        }
        state
    }

    pub fn activity(&self) -> &str {
        &self.activity
    }

    pub fn starting_rating(&self) -> RatingValue {
        self.starting_rating
    }

    pub fn get(&self, participant_id: &str) -> Option<&ParticipantState> {
        self.participants.get(participant_id)
    }

    /// Creates the participant at the starting rating on first encounter
    pub fn participant_mut(&mut self, participant_id: &str) -> &mut ParticipantState {
        let activity = &self.activity;
        let starting_rating = self.starting_rating;
        self.participants
            .entry(participant_id.to_string())
            .or_insert_with(|| ParticipantState::new(participant_id, activity, starting_rating))
    }

    pub fn participants(&self) -> impl Iterator<Item = &ParticipantState> {
        self.participants.values()
    }

    pub fn into_participants(self) -> Vec<ParticipantState> {
        self.participants.into_values().collect()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn global_ratings(&self) -> BTreeMap<ParticipantId, RatingValue> {
        self.participants
            .iter()
            .map(|(id, p)| (id.clone(), p.global_rating))
            .collect()
    }

    pub fn venue_ratings(&self) -> BTreeMap<VenueId, BTreeMap<ParticipantId, RatingValue>> {
        let mut venues: BTreeMap<VenueId, BTreeMap<ParticipantId, RatingValue>> = BTreeMap::new();

        for (id, participant) in &self.participants {
            for (venue_id, rating) in &participant.venue_ratings {
                venues
                    .entry(venue_id.clone())
                    .or_default()
                    .insert(id.clone(), *rating);
            }
        }

        venues
    }
}
