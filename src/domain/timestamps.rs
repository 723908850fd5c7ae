use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Values above this are treated as milliseconds since the epoch
const MILLIS_THRESHOLD: f64 = 1e11;

/// Timestamp as it appears in stored documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Store-native timestamp object
    Native {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    Epoch(f64),
    Text(String),
}

impl RawTimestamp {
    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        RawTimestamp::Text(value.to_rfc3339())
    }
}

type TextStrategy = fn(&str) -> Option<DateTime<Utc>>;

/// Tried in order; the first strategy that yields a value wins.
const TEXT_STRATEGIES: &[TextStrategy] = &[
    parse_rfc3339,
    parse_iso_naive,
    parse_iso_date,
    parse_locale_datetime,
    parse_locale_date,
    parse_numeric_text,
];

/// Parses a stored timestamp, `None` when no strategy accepts it.
pub fn parse_timestamp(raw: &RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Native { seconds, nanoseconds } => {
            Utc.timestamp_opt(*seconds, *nanoseconds).single()
        }
        RawTimestamp::Epoch(value) => from_epoch(*value),
        RawTimestamp::Text(text) => parse_text(text),
    }
}

/// Total variant of [`parse_timestamp`]: missing or unparsable values map to
/// the Unix epoch so they sort before everything else.
pub fn resolve_timestamp(raw: Option<&RawTimestamp>) -> DateTime<Utc> {
    raw.and_then(parse_timestamp).unwrap_or(DateTime::UNIX_EPOCH)
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    TEXT_STRATEGIES.iter().find_map(|strategy| strategy(trimmed))
}

fn parse_rfc3339(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_iso_naive(text: &str) -> Option<DateTime<Utc>> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.and_utc())
}

fn parse_iso_date(text: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_locale_datetime(text: &str) -> Option<DateTime<Utc>> {
    ["%d.%m.%Y %H.%M.%S", "%d.%m.%Y, %H.%M.%S", "%d.%m.%Y %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.and_utc())
}

fn parse_locale_date(text: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(text, "%d.%m.%Y")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_numeric_text(text: &str) -> Option<DateTime<Utc>> {
    text.parse::<f64>().ok().and_then(from_epoch)
}

fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let millis = if value.abs() >= MILLIS_THRESHOLD {
        value
    } else {
        value * 1000.0
    };
    DateTime::from_timestamp_millis(millis.round() as i64)
}
