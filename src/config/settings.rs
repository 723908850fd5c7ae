use serde::{Deserialize, Serialize};

use crate::rating::{RatingPolicy, DEFAULT_K_FACTOR, STARTING_RATING};

#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub starting_rating: f64,
    pub global_k: f64,
    pub default_venue_k: f64,
    pub placement_matches: u32,
    pub placement_multiplier: f64,
    pub office_loss_damping: f64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            starting_rating: STARTING_RATING,
            global_k: DEFAULT_K_FACTOR,
            default_venue_k: DEFAULT_K_FACTOR,
            placement_matches: 10,
            placement_multiplier: 2.0,
            office_loss_damping: 0.8,
        }
    }
}

impl RatingSettings {
    pub fn policy(&self) -> RatingPolicy {
        RatingPolicy {
            global_k: self.global_k,
            placement_matches: self.placement_matches,
            placement_multiplier: self.placement_multiplier,
            office_loss_damping: self.office_loss_damping,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReplaySettings {
    /// Maximum number of writes committed atomically in one batch
    pub batch_size: usize,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self { batch_size: 400 }
    }
}

/// How a season match is credited to a side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WinnerAttribution {
    /// Compare the recorded winner name with each side's display name
    #[default]
    ByName,
    /// Compare the recorded winner id with each side's participant id
    ById,
}

#[derive(Debug, Clone)]
pub struct SeasonSettings {
    pub win_weight: f64,
    pub rating_weight: f64,
    pub underplay_penalty: f64,
    pub attribution: WinnerAttribution,
}

impl Default for SeasonSettings {
    fn default() -> Self {
        Self {
            win_weight: 2.0,
            rating_weight: 0.1,
            underplay_penalty: 0.9,
            attribution: WinnerAttribution::ByName,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BracketSettings {
    /// Entrants promoted from the round-robin stage (8, 4 or 2); derived from
    /// the field size when unset
    pub knockout_size: Option<usize>,
    pub bronze_match: bool,
}

impl Default for BracketSettings {
    fn default() -> Self {
        Self {
            knockout_size: None,
            bronze_match: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub database_path: String,
    pub admin_token: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: "roomscore.db".to_string(),
            admin_token: "secret".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub replay: ReplaySettings,
    pub season: SeasonSettings,
    pub bracket: BracketSettings,
    pub storage: StorageSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `DATABASE_PATH`, `ROOMSCORE_BATCH_SIZE`,
    /// `ROOMSCORE_ADMIN_TOKEN` and `ROOMSCORE_WINNER_ATTRIBUTION`.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.storage.database_path = path;
        }

        if let Some(size) = read_env_parsed::<usize>("ROOMSCORE_BATCH_SIZE").filter(|s| *s > 0) {
            config.replay.batch_size = size;
        }

        if let Ok(token) = std::env::var("ROOMSCORE_ADMIN_TOKEN") {
            config.storage.admin_token = token;
        }

        if let Ok(mode) = std::env::var("ROOMSCORE_WINNER_ATTRIBUTION") {
            config.season.attribution = match mode.to_lowercase().as_str() {
                "id" | "byid" => WinnerAttribution::ById,
                _ => WinnerAttribution::ByName,
            };
        }

        config
    }
}

fn read_env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_rating_rules() {
        let config = AppConfig::new();
        assert_eq!(config.rating.starting_rating, 1000.0);
        assert_eq!(config.rating.policy(), RatingPolicy::default());
        assert_eq!(config.replay.batch_size, 400);
        assert_eq!(config.season.attribution, WinnerAttribution::ByName);
        assert!(config.bracket.bronze_match);
    }
}
