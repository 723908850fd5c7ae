use serde_json::Value;

use crate::errors::ValidationError;

use super::models::MatchRecord;

/// Parses a score submitted by a client. Numbers and numeric strings are
/// accepted; anything else is rejected.
pub fn parse_score(side: &str, value: &Value) -> Result<f64, ValidationError> {
    let score = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ValidationError::NonNumericScore {
        side: side.to_string(),
        value: value.to_string(),
    })?;

    validate_score(side, score)
}

pub fn validate_score(side: &str, score: f64) -> Result<f64, ValidationError> {
    if score.is_finite() && score >= 0.0 {
        Ok(score)
    } else {
        Err(ValidationError::InvalidScore {
            side: side.to_string(),
            value: score,
        })
    }
}

/// Checks a freshly recorded match before it reaches the rating engine.
pub fn validate_match(record: &MatchRecord) -> Result<(), ValidationError> {
    let (home, away, _) = record
        .identifiers()
        .ok_or_else(|| ValidationError::MissingIdentifiers(record.id.clone()))?;

    if home == away {
        return Err(ValidationError::SameParticipant(home.to_string()));
    }

    validate_score("home", record.home.score)?;
    validate_score("away", record.away.score)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_score_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_score("home", &json!(11)), Ok(11.0));
        assert_eq!(parse_score("home", &json!(" 7 ")), Ok(7.0));
    }

    #[test]
    fn test_parse_score_rejects_garbage() {
        assert!(matches!(
            parse_score("away", &json!("eleven")),
            Err(ValidationError::NonNumericScore { .. })
        ));
        assert!(matches!(
            parse_score("away", &json!(null)),
            Err(ValidationError::NonNumericScore { .. })
        ));
        assert!(matches!(
            parse_score("away", &json!(-1)),
            Err(ValidationError::InvalidScore { .. })
        ));
    }

    #[test]
    fn test_validate_score_rejects_nan() {
        assert!(validate_score("home", f64::NAN).is_err());
        assert!(validate_score("home", f64::INFINITY).is_err());
    }
}
