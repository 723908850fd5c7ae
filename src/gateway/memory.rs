use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use crate::bracket::Bracket;
use crate::domain::{MatchRecord, ParticipantState, VenueProfile};
use crate::season::{Achievement, SeasonRecord};

use super::{Gateway, WriteOp};

#[derive(Debug, Default, Clone)]
struct Store {
    matches: BTreeMap<String, MatchRecord>,
    participants: BTreeMap<(String, String), ParticipantState>,
    venues: BTreeMap<String, VenueProfile>,
    brackets: HashMap<String, Bracket>,
    seasons: HashMap<String, Vec<SeasonRecord>>,
    achievements: HashMap<String, Vec<Achievement>>,
}

impl Store {
    fn apply(&mut self, op: WriteOp) {
        match op {
            WriteOp::UpsertMatch(record) => {
                self.matches.insert(record.id.clone(), record);
            }
            WriteOp::UpsertParticipant(state) => {
                let key = (state.activity.clone(), state.participant_id.clone());
                self.participants.insert(key, state);
            }
            WriteOp::UpsertVenue(venue) => {
                self.venues.insert(venue.id.clone(), venue);
            }
            WriteOp::UpsertBracket(bracket) => {
                self.brackets.insert(bracket.tournament_id.clone(), bracket);
            }
            WriteOp::AppendSeason(record) => {
                for (participant_id, achievement) in record.achievements() {
                    self.achievements
                        .entry(participant_id.to_string())
                        .or_default()
                        .push(achievement);
                }
                self.seasons
                    .entry(record.venue_id.clone())
                    .or_default()
                    .push(record);
            }
        }
    }
}

/// In-process document store with the same semantics as the SQLite one
#[derive(Debug, Default)]
pub struct MemoryGateway {
    store: Mutex<Store>,
    /// Batches committed so far
    commits: Mutex<usize>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw matches
    pub fn with_matches(matches: Vec<MatchRecord>) -> Self {
        let gateway = Self::new();
        if let Ok(mut store) = gateway.store.lock() {
            for record in matches {
                store.apply(WriteOp::UpsertMatch(record));
            }
        }
        gateway
    }

    pub fn commit_count(&self) -> usize {
        self.commits.lock().map(|c| *c).unwrap_or(0)
    }

    fn read<T>(&self, f: impl FnOnce(&Store) -> T) -> Result<T> {
        let store = self.store.lock().map_err(|_| anyhow!("Memory store lock poisoned"))?;
        Ok(f(&store))
    }
}

impl Gateway for MemoryGateway {
    fn matches_for_activity(&self, activity: &str) -> Result<Vec<MatchRecord>> {
        self.read(|s| {
            s.matches
                .values()
                .filter(|m| m.activity == activity)
                .cloned()
                .collect()
        })
    }

    fn matches_for_venue(&self, venue_id: &str) -> Result<Vec<MatchRecord>> {
        self.read(|s| {
            s.matches
                .values()
                .filter(|m| m.venue_id.as_deref() == Some(venue_id))
                .cloned()
                .collect()
        })
    }

    fn find_match(&self, match_id: &str) -> Result<Option<MatchRecord>> {
        self.read(|s| s.matches.get(match_id).cloned())
    }

    fn participant(
        &self,
        activity: &str,
        participant_id: &str,
    ) -> Result<Option<ParticipantState>> {
        self.read(|s| {
            s.participants
                .get(&(activity.to_string(), participant_id.to_string()))
                .cloned()
        })
    }

    fn participants_for_activity(&self, activity: &str) -> Result<Vec<ParticipantState>> {
        self.read(|s| {
            s.participants
                .iter()
                .filter(|((a, _), _)| a == activity)
                .map(|(_, p)| p.clone())
                .collect()
        })
    }

    fn venues(&self) -> Result<Vec<VenueProfile>> {
        self.read(|s| s.venues.values().cloned().collect())
    }

    fn bracket(&self, tournament_id: &str) -> Result<Option<Bracket>> {
        self.read(|s| s.brackets.get(tournament_id).cloned())
    }

    fn seasons(&self, venue_id: &str) -> Result<Vec<SeasonRecord>> {
        self.read(|s| s.seasons.get(venue_id).cloned().unwrap_or_default())
    }

    fn achievements(&self, participant_id: &str) -> Result<Vec<Achievement>> {
        self.read(|s| s.achievements.get(participant_id).cloned().unwrap_or_default())
    }

    fn commit_batch(&self, ops: Vec<WriteOp>) -> Result<()> {
        let mut store = self.store.lock().map_err(|_| anyhow!("Memory store lock poisoned"))?;
        for op in ops {
            store.apply(op);
        }
        if let Ok(mut commits) = self.commits.lock() {
            *commits += 1;
        }
        Ok(())
    }
}
