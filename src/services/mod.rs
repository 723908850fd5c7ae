pub mod import;
pub mod rebuild;
pub mod recording;
pub mod season;
pub mod server;
pub mod tournament;
