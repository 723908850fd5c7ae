pub mod settings;
pub mod venues;

pub use settings::{AppConfig, WinnerAttribution};
pub use venues::VenueDirectory;
