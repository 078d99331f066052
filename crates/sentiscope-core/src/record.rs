//! Dataset rows as the engine sees them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable identity of a record.
///
/// Callers guarantee uniqueness within a dataset.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One dataset row with already-coerced numeric fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Stable identifier
    pub index: RecordId,
    /// Calendar date
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Group key
    #[serde(default)]
    pub month: String,
    /// Polarity in [-1, 1]
    #[serde(default)]
    pub sentiment: f64,
    /// Subjectivity in [0, 1]
    #[serde(default)]
    pub subjectivity: f64,
    /// Display text
    #[serde(default)]
    pub raw_text: String,
    /// Metric key to non-negative value
    #[serde(default)]
    pub scores: HashMap<String, f64>,
}

impl Record {
    /// Create a record with only an identifier set.
    #[must_use]
    pub fn new(index: u64) -> Self {
        Self {
            index: RecordId(index),
            ..Self::default()
        }
    }

    /// Set the date.
    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the month bucket.
    #[must_use]
    pub fn month(mut self, month: impl Into<String>) -> Self {
        self.month = month.into();
        self
    }

    /// Set the sentiment score.
    #[must_use]
    pub fn sentiment(mut self, sentiment: f64) -> Self {
        self.sentiment = sentiment;
        self
    }

    /// Set the subjectivity score.
    #[must_use]
    pub fn subjectivity(mut self, subjectivity: f64) -> Self {
        self.subjectivity = subjectivity;
        self
    }

    /// Set the display text.
    #[must_use]
    pub fn raw_text(mut self, text: impl Into<String>) -> Self {
        self.raw_text = text.into();
        self
    }

    /// Add a metric score.
    #[must_use]
    pub fn score(mut self, key: impl Into<String>, value: f64) -> Self {
        self.scores.insert(key.into(), value);
        self
    }

    /// Score for a metric key, zero when absent.
    #[must_use]
    pub fn score_of(&self, key: &str) -> f64 {
        self.scores.get(key).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let r = Record::new(7)
            .date(date)
            .month("March")
            .sentiment(-0.4)
            .subjectivity(0.8)
            .raw_text("hello")
            .score("GPT-4", 0.9);

        assert_eq!(r.index, RecordId(7));
        assert_eq!(r.date, Some(date));
        assert_eq!(r.month, "March");
        assert_eq!(r.score_of("GPT-4"), 0.9);
        assert_eq!(r.score_of("Claude"), 0.0);
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId(42).to_string(), "42");
        assert_eq!(RecordId::from(3), RecordId(3));
    }

    #[test]
    fn test_record_deserializes_camel_case() {
        let json = r#"{"index": 2, "month": "May", "rawText": "hi", "sentiment": 0.5}"#;
        let r: Record = serde_json::from_str(json).unwrap();
        assert_eq!(r.index, RecordId(2));
        assert_eq!(r.raw_text, "hi");
        assert!(r.date.is_none());
        assert!(r.scores.is_empty());
    }
}
