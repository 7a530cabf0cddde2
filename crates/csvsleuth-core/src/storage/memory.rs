/// In-memory history backend.
use super::{materialise, HistoryStorage, StorageError};
use crate::model::{HistoryEntry, NewHistoryEntry};
use parking_lot::Mutex;

/// Keeps entries in a `Vec` behind a mutex. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStorage for MemoryStorage {
    fn add_entry(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, StorageError> {
        let mut entries = self.entries.lock();
        let stored = materialise(entry, &entries);
        entries.push(stored.clone());
        Ok(stored)
    }

    fn remove_entry(&self, id: &str) -> Result<(), StorageError> {
        self.entries.lock().retain(|e| e.id != id);
        Ok(())
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        self.entries.lock().clear();
        Ok(())
    }

    fn list_entries(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        Ok(self.entries.lock().clone())
    }
}
