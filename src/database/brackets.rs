use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::bracket::Bracket;

use super::documents::{decode_column, encode};

pub fn upsert_bracket(conn: &Connection, bracket: &Bracket) -> Result<()> {
    let sql = "INSERT INTO brackets (tournament_id, document) VALUES (?1, ?2) \
               ON CONFLICT(tournament_id) DO UPDATE SET document = excluded.document";
    let document = encode(bracket, "bracket")?;

    conn.execute(sql, params![bracket.tournament_id, document])
        .with_context(|| format!("Failed to upsert bracket {}", bracket.tournament_id))?;
    Ok(())
}

pub fn find(conn: &Connection, tournament_id: &str) -> Result<Option<Bracket>> {
    let sql = "SELECT document FROM brackets WHERE tournament_id = ?1";

    conn.query_row(sql, params![tournament_id], |row| decode_column(row, 0))
        .optional()
        .context("Failed to query bracket")
}
