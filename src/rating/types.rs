use serde::{Deserialize, Serialize};

pub type ParticipantId = String;
pub type VenueId = String;
pub type RatingValue = f64;

pub const STARTING_RATING: RatingValue = 1000.0;
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Rule set a venue plays under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitiveMode {
    /// Casual play, losses are dampened
    #[default]
    Office,
    /// Ranked play with placement volatility
    Professional,
    /// Ratings are cosmetic
    Arcade,
}

impl CompetitiveMode {
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "office" => Some(Self::Office),
            "professional" => Some(Self::Professional),
            "arcade" => Some(Self::Arcade),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CompetitiveMode::Office => "office",
            CompetitiveMode::Professional => "professional",
            CompetitiveMode::Arcade => "arcade",
        }
    }
}

/// Which rating a delta is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingScope {
    Global,
    Venue(CompetitiveMode),
}

/// Constants that parameterise the rating formulas
#[derive(Debug, Clone, PartialEq)]
pub struct RatingPolicy {
    pub global_k: f64,
    pub placement_matches: u32,
    pub placement_multiplier: f64,
    pub office_loss_damping: f64,
}

impl Default for RatingPolicy {
    fn default() -> Self {
        Self {
            global_k: DEFAULT_K_FACTOR,
            placement_matches: 10,
            placement_multiplier: 2.0,
            office_loss_damping: 0.8,
        }
    }
}
