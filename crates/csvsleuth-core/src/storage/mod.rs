/// Storage collaborator: the persistence boundary behind the history.
///
/// The workflow writes one entry per finished analysis; the history store
/// reads the full list back. Both hold the same [`SharedStorage`].
///
/// Backends:
/// - [`MemoryStorage`]: process-lifetime only (tests, ephemeral sessions).
/// - [`JsonFileStorage`]: one JSON array in one file, replaced atomically.
pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::model::{HistoryEntry, NewHistoryEntry};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("history file {} is corrupt", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialise history: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Ordered key-value persistence for history entries.
///
/// `list_entries` returns entries in insertion order. `remove_entry` with an
/// unknown id succeeds without changing anything.
pub trait HistoryStorage: Send + Sync {
    /// Persist a new entry, assigning its id and timestamp.
    fn add_entry(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, StorageError>;
    fn remove_entry(&self, id: &str) -> Result<(), StorageError>;
    fn clear_all(&self) -> Result<(), StorageError>;
    fn list_entries(&self) -> Result<Vec<HistoryEntry>, StorageError>;
}

/// Storage handle shared between the workflow and the history store.
pub type SharedStorage = Arc<dyn HistoryStorage>;

/// Materialise a [`NewHistoryEntry`] on top of `existing`.
///
/// The timestamp never goes backwards relative to the last stored entry,
/// even if the wall clock does.
pub(crate) fn materialise(entry: NewHistoryEntry, existing: &[HistoryEntry]) -> HistoryEntry {
    let now = Utc::now();
    let timestamp: DateTime<Utc> = match existing.last() {
        Some(last) if last.timestamp > now => last.timestamp,
        _ => now,
    };
    HistoryEntry {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp,
        file_name: entry.file_name,
        highlights: entry.highlights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn timestamp_is_clamped_to_last_entry() {
        let future = Utc::now() + Duration::hours(1);
        let existing = vec![HistoryEntry {
            id: "x".into(),
            timestamp: future,
            file_name: "a.csv".into(),
            highlights: None,
        }];
        let entry = materialise(NewHistoryEntry::failure("b.csv"), &existing);
        assert_eq!(entry.timestamp, future);
        assert_eq!(entry.file_name, "b.csv");
    }

    #[test]
    fn ids_are_unique() {
        let a = materialise(NewHistoryEntry::failure("a.csv"), &[]);
        let b = materialise(NewHistoryEntry::failure("a.csv"), &[]);
        assert_ne!(a.id, b.id);
    }
}
