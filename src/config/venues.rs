use std::collections::HashMap;

use crate::domain::VenueProfile;
use crate::rating::{CompetitiveMode, VenueId};

/// Venue rule lookup used when computing local ratings.
///
/// Venues that were never registered play under office rules with the
/// configured default K-factor.
#[derive(Debug, Clone)]
pub struct VenueDirectory {
    venues: HashMap<VenueId, VenueProfile>,
    default_k: f64,
}

impl VenueDirectory {
    pub fn new(default_k: f64) -> Self {
        Self {
            venues: HashMap::new(),
            default_k,
        }
    }

    pub fn from_profiles(profiles: Vec<VenueProfile>, default_k: f64) -> Self {
        let mut directory = Self::new(default_k);
        for profile in profiles {
            directory.insert(profile);
        }
        directory
    }

    pub fn insert(&mut self, profile: VenueProfile) {
        self.venues.insert(profile.id.clone(), profile);
    }

    pub fn get(&self, venue_id: &str) -> Option<&VenueProfile> {
        self.venues.get(venue_id)
    }

    pub fn mode(&self, venue_id: &str) -> CompetitiveMode {
        self.get(venue_id).map(|v| v.mode).unwrap_or_default()
    }

    pub fn k_factor(&self, venue_id: &str) -> f64 {
        self.get(venue_id)
            .and_then(|v| v.k_factor)
            .unwrap_or(self.default_k)
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}

impl Default for VenueDirectory {
    fn default() -> Self {
        Self::new(crate::rating::DEFAULT_K_FACTOR)
    }
}
