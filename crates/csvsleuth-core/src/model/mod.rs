/// Data model for CsvSleuth.
///
/// Highlights, history entries, and the selected input file.
pub mod file;
pub mod format;
pub mod highlights;
pub mod history_entry;

pub use file::{is_csv_file, SelectedFile};
pub use highlights::{HighlightCard, Highlights};
pub use history_entry::{HistoryEntry, NewHistoryEntry};
