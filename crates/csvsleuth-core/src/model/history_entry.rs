/// Persisted history records.
///
/// One entry per analysis attempt. An entry without `highlights` is a
/// recorded failure; the key is omitted from the JSON entirely in that case.
use super::highlights::Highlights;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored analysis attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Unique id assigned by the storage backend.
    pub id: String,
    /// Creation time, persisted as Unix milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Highlights>,
}

impl HistoryEntry {
    /// `true` if this entry records a failed analysis.
    pub fn is_failure(&self) -> bool {
        self.highlights.is_none()
    }
}

/// What the workflow hands to storage; id and timestamp are filled in there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHistoryEntry {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Highlights>,
}

impl NewHistoryEntry {
    pub fn success(file_name: impl Into<String>, highlights: Highlights) -> Self {
        Self {
            file_name: file_name.into(),
            highlights: Some(highlights),
        }
    }

    pub fn failure(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            highlights: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_entry_omits_highlights_key() {
        let entry = HistoryEntry {
            id: "1".into(),
            timestamp: DateTime::from_timestamp_millis(1_762_076_480_016).unwrap(),
            file_name: "error-test.csv".into(),
            highlights: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["fileName"], "error-test.csv");
        assert_eq!(json["timestamp"], 1_762_076_480_016_i64);
        assert!(json.get("highlights").is_none());
        assert!(entry.is_failure());
    }

    #[test]
    fn parses_entry_written_by_older_builds() {
        let json = r#"{
            "id": "2",
            "timestamp": 1762076480016,
            "fileName": "test1.csv",
            "highlights": {
                "total_spend_galactic": 1000,
                "rows_affected": 50,
                "less_spent_at": 100,
                "big_spent_at": 300,
                "less_spent_value": 50,
                "big_spent_value": 200,
                "average_spend_galactic": 150,
                "big_spent_civ": "humans",
                "less_spent_civ": "aliens"
            }
        }"#;
        let entry: HistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.file_name, "test1.csv");
        let h = entry.highlights.expect("highlights");
        assert_eq!(h.total_spend_galactic, 1000.0);
        assert_eq!(h.big_spent_civ, "humans");
    }

    #[test]
    fn new_entry_constructors() {
        assert!(NewHistoryEntry::failure("a.csv").highlights.is_none());
        let ok = NewHistoryEntry::success("b.csv", Highlights::default());
        assert_eq!(ok.file_name, "b.csv");
        assert!(ok.highlights.is_some());
    }
}
