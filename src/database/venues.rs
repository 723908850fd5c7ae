use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::domain::VenueProfile;

use super::documents::{decode_column, encode};

pub fn upsert_venue(conn: &Connection, venue: &VenueProfile) -> Result<()> {
    let sql = "INSERT INTO venues (id, document) VALUES (?1, ?2) \
               ON CONFLICT(id) DO UPDATE SET document = excluded.document";
    let document = encode(venue, "venue")?;

    conn.execute(sql, params![venue.id, document])
        .with_context(|| format!("Failed to upsert venue {}", venue.id))?;
    Ok(())
}

pub fn list_all(conn: &Connection) -> Result<Vec<VenueProfile>> {
    let sql = "SELECT document FROM venues ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| decode_column(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load venues")?;

    Ok(rows)
}
