//! Case record enrichment

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::CaseFileError;

/// Date-time with 1 to 6 fractional digits followed by a UTC offset.
static CASE_DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{1,6}([+-]\d{2}:?\d{2}|Z)$")
        .expect("valid case date regex")
});

const CASE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Parse a case `date` such as `2025-01-02T03:04:05.123456+00:00`.
pub fn parse_case_date(value: &str) -> Result<DateTime<FixedOffset>, String> {
    if !CASE_DATE_SHAPE.is_match(value) {
        return Err(format!("does not match {CASE_DATE_FORMAT}"));
    }
    let normalized = match value.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => value.to_string(),
    };
    DateTime::parse_from_str(&normalized, CASE_DATE_FORMAT).map_err(|e| e.to_string())
}

/// Unix epoch seconds with microsecond precision.
fn epoch_seconds(date: &DateTime<FixedOffset>) -> f64 {
    date.timestamp_micros() as f64 / 1_000_000.0
}

/// Enrich one case event for output.
///
/// Adds `timestamp`, `host`, `case_id` and `source`. Keys already present in the
/// event keep their position and are overwritten.
pub fn enrich_event(
    event: Value,
    folder: &str,
    case_id: &str,
    source: &str,
) -> Result<Map<String, Value>, CaseFileError> {
    let Value::Object(mut fields) = event else {
        return Err(CaseFileError::NotAnObject {
            case_id: case_id.to_string(),
        });
    };

    let date = match fields.get("date") {
        None => {
            return Err(CaseFileError::MissingDate {
                case_id: case_id.to_string(),
            })
        }
        Some(Value::String(date)) => date,
        Some(other) => {
            return Err(CaseFileError::InvalidDate {
                case_id: case_id.to_string(),
                value: other.to_string(),
                reason: "not a string".to_string(),
            })
        }
    };

    let parsed = parse_case_date(date).map_err(|reason| CaseFileError::InvalidDate {
        case_id: case_id.to_string(),
        value: date.clone(),
        reason,
    })?;

    let timestamp = serde_json::Number::from_f64(epoch_seconds(&parsed))
        .map(Value::Number)
        .unwrap_or(Value::Null);

    fields.insert("timestamp".to_string(), timestamp);
    fields.insert("host".to_string(), Value::String(folder.to_string()));
    fields.insert("case_id".to_string(), Value::String(case_id.to_string()));
    fields.insert("source".to_string(), Value::String(source.to_string()));
    Ok(fields)
}
