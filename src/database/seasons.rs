use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::season::{Achievement, SeasonRecord};

use super::documents::{decode_column, encode};

/// Stores a closed season and one achievement per participant. Fails if the
/// season index is already taken for the venue.
pub fn insert_season(conn: &Connection, record: &SeasonRecord) -> Result<()> {
    let sql = "INSERT INTO seasons (venue_id, season_index, document) VALUES (?1, ?2, ?3)";
    let document = encode(record, "season")?;

    conn.execute(sql, params![record.venue_id, record.season_index, document])
        .with_context(|| {
            format!("Failed to insert season {} of venue {}", record.season_index, record.venue_id)
        })?;

    for (participant_id, achievement) in record.achievements() {
        insert_achievement(conn, participant_id, &achievement)?;
    }
    Ok(())
}

fn insert_achievement(
    conn: &Connection,
    participant_id: &str,
    achievement: &Achievement,
) -> Result<()> {
    let sql = "INSERT INTO achievements (participant_id, venue_id, season_index, document) \
               VALUES (?1, ?2, ?3, ?4)";
    let document = encode(achievement, "achievement")?;

    conn.execute(
        sql,
        params![participant_id, achievement.venue_id, achievement.season_index, document],
    )
    .with_context(|| format!("Failed to insert achievement for {participant_id}"))?;
    Ok(())
}

pub fn list_by_venue(conn: &Connection, venue_id: &str) -> Result<Vec<SeasonRecord>> {
    let sql = "SELECT document FROM seasons WHERE venue_id = ?1 ORDER BY season_index";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![venue_id], |row| decode_column(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load seasons")?;

    Ok(rows)
}

pub fn achievements_of(conn: &Connection, participant_id: &str) -> Result<Vec<Achievement>> {
    let sql = "SELECT document FROM achievements WHERE participant_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![participant_id], |row| decode_column(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load achievements")?;

    Ok(rows)
}
