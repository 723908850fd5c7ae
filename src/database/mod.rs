pub mod brackets;
pub mod connection;
mod documents;
mod gateway;
pub mod matches;
pub mod participants;
pub mod seasons;
pub mod setup;
pub mod venues;

pub use connection::{create_pool, get_connection, DbConn, DbPool};
pub use gateway::SqliteGateway;
