use serde::Serialize;

/// Counters reported after a replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub processed: usize,
    pub skipped: usize,
    pub ties: usize,
    pub unranked: usize,
    /// Matches whose timestamp could not be parsed and were sorted first
    pub undated: usize,
}

impl ReplaySummary {
    pub fn total(&self) -> usize {
        self.processed + self.skipped
    }
}

impl std::fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} processed, {} skipped, {} ties, {} unranked, {} undated",
            self.processed, self.skipped, self.ties, self.unranked, self.undated
        )
    }
}
