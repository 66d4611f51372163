//! Column type inference for untyped sources.
//!
//! Chart-formatted JSON declares a type per column, but record arrays do
//! not. This module classifies individual JSON values and merges the
//! verdicts across a sampled prefix of the rows into one column type.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::Value as JsonValue;

use crate::data::datatable::ColumnType;

// Strict patterns keep ID strings like "ORDER-2024-001" out of the
// chrono parse path.
static DATETIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(19|20)\d{2}[-/](0[1-9]|1[0-2])[-/](0[1-9]|[12]\d|3[01])[T ]\d{2}:\d{2}:\d{2}")
        .unwrap()
});

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(19|20)\d{2}[-/](0[1-9]|1[0-2])[-/](0[1-9]|[12]\d|3[01])$").unwrap()
});

static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}(:\d{2})?$").unwrap());

const DATETIME_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Classify a single JSON value. Null yields `None` so that absent cells
/// never influence the column verdict.
pub fn classify_value(value: &JsonValue) -> Option<ColumnType> {
    match value {
        JsonValue::Null => None,
        JsonValue::Bool(_) => Some(ColumnType::Boolean),
        JsonValue::Number(_) => Some(ColumnType::Number),
        JsonValue::String(s) => Some(classify_text(s)),
        JsonValue::Array(_) | JsonValue::Object(_) => Some(ColumnType::String),
    }
}

fn classify_text(text: &str) -> ColumnType {
    // Regex prefilter first; chrono parsing is the expensive step.
    if DATETIME_PATTERN.is_match(text) && parse_datetime(text).is_some() {
        ColumnType::DateTime
    } else if DATE_PATTERN.is_match(text) && parse_datetime(text).is_some() {
        ColumnType::Date
    } else if TIME_PATTERN.is_match(text) && parse_time(text).is_some() {
        ColumnType::TimeOfDay
    } else {
        ColumnType::String
    }
}

/// Fold one more observed type into the running verdict for a column.
///
/// Rules:
/// - Same type -> keep it
/// - Date + DateTime -> DateTime
/// - Everything else mixed -> String
pub fn merge_types(current: Option<ColumnType>, observed: ColumnType) -> ColumnType {
    match current {
        None => observed,
        Some(current) if current == observed => current,
        Some(ColumnType::Date) if observed == ColumnType::DateTime => ColumnType::DateTime,
        Some(ColumnType::DateTime) if observed == ColumnType::Date => ColumnType::DateTime,
        Some(_) => ColumnType::String,
    }
}

/// Parse a datetime string, accepting date-only forms at midnight.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(text, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}

pub fn parse_time(text: &str) -> Option<NaiveTime> {
    for format in TIME_FORMATS {
        if let Ok(parsed) = NaiveTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    None
}
