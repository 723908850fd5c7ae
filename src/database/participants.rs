use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::ParticipantState;

use super::documents::{decode_column, encode};

pub fn upsert_participant(conn: &Connection, state: &ParticipantState) -> Result<()> {
    let sql = "INSERT INTO participants (activity, participant_id, document) VALUES (?1, ?2, ?3) \
               ON CONFLICT(activity, participant_id) DO UPDATE SET document = excluded.document";
    let document = encode(state, "participant")?;

    conn.execute(sql, params![state.activity, state.participant_id, document])
        .with_context(|| format!("Failed to upsert participant {}", state.participant_id))?;
    Ok(())
}

fn parse_participant_row(row: &rusqlite::Row) -> rusqlite::Result<ParticipantState> {
    decode_column(row, 0)
}

pub fn find(
    conn: &Connection,
    activity: &str,
    participant_id: &str,
) -> Result<Option<ParticipantState>> {
    let sql = "SELECT document FROM participants WHERE activity = ?1 AND participant_id = ?2";

    conn.query_row(sql, params![activity, participant_id], parse_participant_row)
        .optional()
        .context("Failed to query participant")
}

pub fn list_by_activity(conn: &Connection, activity: &str) -> Result<Vec<ParticipantState>> {
    let sql = "SELECT document FROM participants WHERE activity = ?1 ORDER BY participant_id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![activity], parse_participant_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load participants")?;

    Ok(rows)
}
