use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::bracket::Bracket;
use crate::domain::{MatchRecord, ParticipantState, VenueProfile};
use crate::gateway::{Gateway, WriteOp};
use crate::season::{Achievement, SeasonRecord};

use super::connection::{create_pool, get_connection, DbPool};
use super::{brackets, matches, participants, seasons, setup, venues};

/// [`Gateway`] over a pooled SQLite database holding JSON documents
#[derive(Clone)]
pub struct SqliteGateway {
    pool: DbPool,
}

impl SqliteGateway {
    /// Opens (or creates) the database file and makes sure the schema exists
    pub fn open(database_path: &str) -> Result<Self> {
        let pool = create_pool(database_path)?;
        let conn = get_connection(&pool)?;
        setup::create_schema(&conn)?;
        log::debug!("Opened database {}", database_path);

        Ok(Self { pool })
    }

    pub fn reset(&self) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        setup::reset_database(&conn)
    }
}

fn apply_op(conn: &Connection, op: &WriteOp) -> Result<()> {
    match op {
        WriteOp::UpsertMatch(record) => matches::upsert_match(conn, record),
        WriteOp::UpsertParticipant(state) => participants::upsert_participant(conn, state),
        WriteOp::UpsertVenue(venue) => venues::upsert_venue(conn, venue),
        WriteOp::UpsertBracket(bracket) => brackets::upsert_bracket(conn, bracket),
        WriteOp::AppendSeason(record) => seasons::insert_season(conn, record),
    }
}

impl Gateway for SqliteGateway {
    fn matches_for_activity(&self, activity: &str) -> Result<Vec<MatchRecord>> {
        let conn = get_connection(&self.pool)?;
        matches::list_by_activity(&conn, activity)
    }

    fn matches_for_venue(&self, venue_id: &str) -> Result<Vec<MatchRecord>> {
        let conn = get_connection(&self.pool)?;
        matches::list_by_venue(&conn, venue_id)
    }

    fn find_match(&self, match_id: &str) -> Result<Option<MatchRecord>> {
        let conn = get_connection(&self.pool)?;
        matches::find_by_id(&conn, match_id)
    }

    fn participant(
        &self,
        activity: &str,
        participant_id: &str,
    ) -> Result<Option<ParticipantState>> {
        let conn = get_connection(&self.pool)?;
        participants::find(&conn, activity, participant_id)
    }

    fn participants_for_activity(&self, activity: &str) -> Result<Vec<ParticipantState>> {
        let conn = get_connection(&self.pool)?;
        participants::list_by_activity(&conn, activity)
    }

    fn venues(&self) -> Result<Vec<VenueProfile>> {
        let conn = get_connection(&self.pool)?;
        venues::list_all(&conn)
    }

    fn bracket(&self, tournament_id: &str) -> Result<Option<Bracket>> {
        let conn = get_connection(&self.pool)?;
        brackets::find(&conn, tournament_id)
    }

    fn seasons(&self, venue_id: &str) -> Result<Vec<SeasonRecord>> {
        let conn = get_connection(&self.pool)?;
        seasons::list_by_venue(&conn, venue_id)
    }

    fn achievements(&self, participant_id: &str) -> Result<Vec<Achievement>> {
        let conn = get_connection(&self.pool)?;
        seasons::achievements_of(&conn, participant_id)
    }

    fn commit_batch(&self, ops: Vec<WriteOp>) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to begin transaction")?;

        for (idx, op) in ops.iter().enumerate() {
            apply_op(&tx, op).with_context(|| format!("Write {} ({}) failed", idx + 1, op.kind()))?;
        }

        tx.commit().context("Failed to commit batch")?;
        log::debug!("Committed batch of {} writes", ops.len());
        Ok(())
    }
}
