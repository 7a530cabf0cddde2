/// History store: the in-memory projection of persisted history.
///
/// Reads are always a full replace from storage, never a merge. Mutations
/// go to storage first; memory is only updated once the write succeeded, so
/// a failed write leaves both sides as they were.
use crate::model::HistoryEntry;
use crate::storage::{SharedStorage, StorageError};
use tracing::{debug, info};

/// History list plus the single-entry viewer selection.
pub struct HistoryStore {
    storage: SharedStorage,
    history: Vec<HistoryEntry>,
    selected: Option<HistoryEntry>,
    modal_requested: bool,
}

impl HistoryStore {
    /// Create an empty store. Call [`load_from_storage`](Self::load_from_storage)
    /// before the first display.
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            storage,
            history: Vec::new(),
            selected: None,
            modal_requested: false,
        }
    }

    /// Replace the in-memory list with what storage currently holds.
    pub fn load_from_storage(&mut self) -> Result<(), StorageError> {
        self.history = self.storage.list_entries()?;
        debug!("Loaded {} history entries", self.history.len());
        Ok(())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Select `entry` and ask for the viewer to open.
    pub fn select(&mut self, entry: HistoryEntry) {
        self.selected = Some(entry);
        self.modal_requested = true;
    }

    /// The currently selected entry, if any (open or not).
    pub fn selected(&self) -> Option<&HistoryEntry> {
        self.selected.as_ref()
    }

    /// Whether the viewer is showing an entry.
    ///
    /// An entry without highlights is never shown, even if it was selected.
    pub fn is_modal_open(&self) -> bool {
        self.modal_requested && self.selected.as_ref().is_some_and(|e| !e.is_failure())
    }

    /// The entry the viewer should render, if it is open.
    pub fn open_entry(&self) -> Option<&HistoryEntry> {
        if self.is_modal_open() {
            self.selected.as_ref()
        } else {
            None
        }
    }

    /// Close the viewer. The selection itself is kept.
    pub fn dismiss(&mut self) {
        self.modal_requested = false;
    }

    /// Delete one entry from storage, then from memory. Unknown ids are ignored.
    pub fn remove_one(&mut self, id: &str) -> Result<(), StorageError> {
        self.storage.remove_entry(id)?;
        let before = self.history.len();
        self.history.retain(|e| e.id != id);
        if self.history.len() == before {
            debug!("remove_one: no history entry with id {id}");
            return Ok(());
        }
        if self.selected.as_ref().is_some_and(|e| e.id == id) {
            self.selected = None;
            self.modal_requested = false;
        }
        info!("Removed history entry {id}");
        Ok(())
    }

    /// Delete every entry from storage, then from memory.
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        self.storage.clear_all()?;
        self.history.clear();
        self.selected = None;
        self.modal_requested = false;
        info!("Cleared history");
        Ok(())
    }
}
