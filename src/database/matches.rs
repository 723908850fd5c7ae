use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::MatchRecord;

use super::documents::{decode_column, encode};

pub fn upsert_match(conn: &Connection, record: &MatchRecord) -> Result<()> {
    let sql = "INSERT INTO matches (id, activity, venue_id, document) VALUES (?1, ?2, ?3, ?4) \
               ON CONFLICT(id) DO UPDATE SET activity = excluded.activity, \
               venue_id = excluded.venue_id, document = excluded.document";
    let document = encode(record, "match")?;

    conn.execute(sql, params![record.id, record.activity, record.venue_id, document])
        .with_context(|| format!("Failed to upsert match {}", record.id))?;
    Ok(())
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<MatchRecord> {
    decode_column(row, 0)
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<MatchRecord>> {
    let sql = "SELECT document FROM matches WHERE id = ?1";

    conn.query_row(sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

pub fn list_by_activity(conn: &Connection, activity: &str) -> Result<Vec<MatchRecord>> {
    let sql = "SELECT document FROM matches WHERE activity = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![activity], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load matches by activity")?;

    Ok(rows)
}

pub fn list_by_venue(conn: &Connection, venue_id: &str) -> Result<Vec<MatchRecord>> {
    let sql = "SELECT document FROM matches WHERE venue_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![venue_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load matches by venue")?;

    Ok(rows)
}
