/// File-backed history: the whole list lives in one JSON array.
///
/// Every mutation is a read-modify-write of the full array. The new content
/// goes to `<file>.tmp` first and is then renamed over the original, so a
/// crash mid-write leaves the previous history intact.
use super::{materialise, HistoryStorage, StorageError};
use crate::model::{HistoryEntry, NewHistoryEntry};
use parking_lot::Mutex;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// History persisted to a single JSON file.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    /// Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStorage {
    /// Use `path` as the history file. The file is created on first write;
    /// a missing file reads as an empty history.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, entries: &[HistoryEntry]) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");
        {
            let file = fs::File::create(&temp_path).map_err(io_err)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, entries)?;
            writer.flush().map_err(io_err)?;
        }
        fs::rename(&temp_path, &self.path).map_err(io_err)?;
        debug!("Wrote {} history entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl HistoryStorage for JsonFileStorage {
    fn add_entry(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        let stored = materialise(entry, &entries);
        entries.push(stored.clone());
        self.write_all(&entries)?;
        Ok(stored)
    }

    fn remove_entry(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(());
        }
        self.write_all(&entries)
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        self.write_all(&[])
    }

    fn list_entries(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let _guard = self.lock.lock();
        self.read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Highlights;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty_history() {
        let tmp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(tmp.path().join("history.json"));
        assert!(storage.list_entries().unwrap().is_empty());
    }

    #[test]
    fn entries_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("history.json");
        {
            let storage = JsonFileStorage::new(&path);
            storage
                .add_entry(NewHistoryEntry::success("a.csv", Highlights::default()))
                .unwrap();
            storage.add_entry(NewHistoryEntry::failure("b.csv")).unwrap();
        }
        let reopened = JsonFileStorage::new(&path);
        let entries = reopened.list_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name, "a.csv");
        assert!(entries[0].highlights.is_some());
        assert_eq!(entries[1].file_name, "b.csv");
        assert!(entries[1].is_failure());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn remove_and_clear() {
        let tmp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(tmp.path().join("history.json"));
        let a = storage.add_entry(NewHistoryEntry::failure("a.csv")).unwrap();
        storage.add_entry(NewHistoryEntry::failure("b.csv")).unwrap();

        storage.remove_entry(&a.id).unwrap();
        let names: Vec<_> = storage
            .list_entries()
            .unwrap()
            .into_iter()
            .map(|e| e.file_name)
            .collect();
        assert_eq!(names, ["b.csv"]);

        storage.clear_all().unwrap();
        assert!(storage.list_entries().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("history.json");
        fs::write(&path, "{not json").unwrap();
        let storage = JsonFileStorage::new(&path);
        assert!(matches!(
            storage.list_entries(),
            Err(StorageError::Corrupt { .. })
        ));
    }
}
