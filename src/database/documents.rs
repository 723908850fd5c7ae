use anyhow::{Context, Result};
use rusqlite::types::Type;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes a document for storage in a `document` column
pub fn encode<T: Serialize>(document: &T, data_type: &str) -> Result<String> {
    serde_json::to_string(document).with_context(|| format!("Failed to serialize {data_type}"))
}

/// Reads the JSON document stored in column `idx`
pub fn decode_column<T: DeserializeOwned>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
