//! Coercion of uploaded JSON rows into [`Record`]s.
//!
//! Rows are objects as exported by the dashboard: `idx`, `Date`, `Month`,
//! `Sentiment`, `Subjectivity`, `RawTweet` and one numeric column per metric
//! key. Numeric fields may be numbers or numeric strings; anything that
//! does not parse counts as zero.

use chrono::NaiveDate;
use sentiscope_core::{Record, RecordId};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Error type for dataset ingestion.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The document is not valid JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// The top-level value is not an array of rows
    #[error("expected a JSON array of rows, found {0}")]
    NotAnArray(&'static str),
    /// A row could not be interpreted
    #[error("row {row}: {reason}")]
    InvalidRow {
        /// Zero-based row position
        row: usize,
        /// What went wrong
        reason: String,
    },
}

const INDEX_FIELDS: [&str; 3] = ["idx", "index", "Index"];
const DATE_FIELDS: [&str; 2] = ["Date", "date"];
const MONTH_FIELDS: [&str; 2] = ["Month", "month"];
const SENTIMENT_FIELDS: [&str; 2] = ["Sentiment", "sentiment"];
const SUBJECTIVITY_FIELDS: [&str; 2] = ["Subjectivity", "subjectivity"];
const TEXT_FIELDS: [&str; 4] = ["RawTweet", "rawText", "raw_text", "text"];

/// Parse a JSON array of rows.
///
/// `keys` names the metric columns to read into [`Record::scores`]. Rows
/// without an identifier get their position as index.
///
/// # Errors
///
/// Returns error if the document is not JSON, not an array, or contains a
/// row that is not an object or has a negative or fractional index.
pub fn records_from_json(json: &str, keys: &[String]) -> Result<Vec<Record>, DatasetError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(rows) = value else {
        return Err(DatasetError::NotAnArray(kind(&value)));
    };

    let records = rows
        .iter()
        .enumerate()
        .map(|(row, value)| record_from_row(row, value, keys))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(records = records.len(), keys = keys.len(), "dataset coerced");
    Ok(records)
}

fn record_from_row(row: usize, value: &Value, keys: &[String]) -> Result<Record, DatasetError> {
    let Value::Object(fields) = value else {
        return Err(DatasetError::InvalidRow {
            row,
            reason: format!("expected an object, found {}", kind(value)),
        });
    };

    let index = match lookup(fields, &INDEX_FIELDS) {
        Some(v) => parse_index(v).ok_or_else(|| DatasetError::InvalidRow {
            row,
            reason: format!("index {v} is not a non-negative integer"),
        })?,
        None => row as u64,
    };

    let mut record = Record::new(index);
    record.date = lookup(fields, &DATE_FIELDS).and_then(|v| {
        let date = v.as_str().and_then(parse_date);
        if date.is_none() {
            warn!(row, value = %v, "unparsable date ignored");
        }
        date
    });
    record.month = lookup(fields, &MONTH_FIELDS)
        .map(display_string)
        .unwrap_or_default();
    record.sentiment = coerce_number(lookup(fields, &SENTIMENT_FIELDS), row, "Sentiment");
    record.subjectivity = coerce_number(lookup(fields, &SUBJECTIVITY_FIELDS), row, "Subjectivity");
    record.raw_text = lookup(fields, &TEXT_FIELDS)
        .map(display_string)
        .unwrap_or_default();
    for key in keys {
        if fields.contains_key(key) {
            let v = coerce_number(fields.get(key), row, key);
            record.scores.insert(key.clone(), v);
        }
    }
    Ok(record)
}

fn lookup<'a>(fields: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| fields.get(*name))
}

fn parse_index(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse `YYYY-MM-DD`, also accepting a trailing time part.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Numeric coercion: numbers pass through, numeric strings parse, booleans
/// become 0/1, null and empty strings become 0. Anything else is 0 with a
/// warning.
fn coerce_number(value: Option<&Value>, row: usize, field: &str) -> f64 {
    let coerced = match value {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                s.parse::<f64>().ok()
            }
        }
        Some(Value::Array(_) | Value::Object(_)) => None,
    };
    match coerced.filter(|v| v.is_finite()) {
        Some(v) => v,
        None => {
            warn!(row, field, "non-numeric value coerced to 0");
            0.0
        }
    }
}

fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Distinct identifiers, for checking the uniqueness precondition.
#[must_use]
pub fn has_unique_ids(records: &[Record]) -> bool {
    let mut seen: Vec<RecordId> = records.iter().map(|r| r.index).collect();
    seen.sort_unstable();
    seen.windows(2).all(|w| w[0] != w[1])
}
