use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::Value;

use crate::config::settings::AppConfig;
use crate::domain::{parse_score, MatchRecord};
use crate::gateway::{Gateway, WriteOp};

use super::rebuild::commit_in_batches;

/// Outcome of loading a match file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub stored: usize,
    pub rejected: usize,
}

/// Loads raw match documents into the store. Ratings are not touched; run
/// a rebuild afterwards.
pub struct ImportService<'a> {
    gateway: &'a dyn Gateway,
    config: &'a AppConfig,
}

impl<'a> ImportService<'a> {
    pub fn new(gateway: &'a dyn Gateway, config: &'a AppConfig) -> Self {
        Self { gateway, config }
    }

    pub fn run(&self, activity: &str, path: &Path) -> Result<ImportReport> {
        info!("=== Importing {} matches from {} ===", activity, path.display());

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let documents: Vec<Value> = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a JSON array of matches", path.display()))?;

        self.store(activity, documents)
    }

    pub fn store(&self, activity: &str, documents: Vec<Value>) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        let mut ops = Vec::with_capacity(documents.len());

        for (idx, document) in documents.into_iter().enumerate() {
            match normalize(activity, document) {
                Ok(record) => ops.push(WriteOp::UpsertMatch(record)),
                Err(e) => {
                    warn!("Rejected match #{}: {:#}", idx + 1, e);
                    report.rejected += 1;
                }
            }
        }

        report.stored = ops.len();
        commit_in_batches(self.gateway, ops, self.config.replay.batch_size)?;

        info!("  → Stored {}, rejected {}", report.stored, report.rejected);
        Ok(report)
    }
}

/// Coerces numeric string scores and stamps the activity
fn normalize(activity: &str, mut document: Value) -> Result<MatchRecord> {
    for side in ["home", "away"] {
        let Some(score) = document.get_mut(side).and_then(|s| s.get_mut("score")) else {
            continue;
        };
        let parsed = parse_score(side, score)?;
        *score = Value::from(parsed);
    }
    if let Some(object) = document.as_object_mut() {
        object.insert("activity".to_string(), Value::from(activity));
    }

    serde_json::from_value(document).context("Malformed match document")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use serde_json::json;

    fn document(id: &str, home_score: Value) -> Value {
        json!({
            "id": id,
            "timestamp": "05.03.2024 18.30.15",
            "venueId": "v1",
            "home": {"participantId": "a", "name": "Ann", "score": home_score, "side": "home"},
            "away": {"participantId": "b", "name": "Bob", "score": 3, "side": "away"}
        })
    }

    #[test]
    fn test_invalid_scores_are_rejected() {
        let gateway = MemoryGateway::new();
        let config = AppConfig::new();
        let documents = vec![
            document("m1", json!(5)),
            document("m2", json!("7")),
            document("m3", json!("seven")),
            document("m4", json!(-1)),
            json!({"id": "m5"}),
        ];

        let report = ImportService::new(&gateway, &config).store("pool", documents).unwrap();

        assert_eq!(report, ImportReport { stored: 2, rejected: 3 });
        let stored = gateway.find_match("m2").unwrap().unwrap();
        assert_eq!(stored.home.score, 7.0);
        assert_eq!(stored.activity, "pool");
    }
}
