/// CsvSleuth Core: analysis workflow, history, and the CSV engine.
///
/// This crate contains all business logic with zero UI dependencies.
///
/// # Modules
///
/// - [`model`]: Highlights, history entries, and the selected file.
/// - [`analysis`]: The analysis collaborator: background CSV reading with streamed results.
/// - [`workflow`]: The idle/processing/completed/error session state machine.
/// - [`history`]: In-memory history projection and the entry viewer selection.
/// - [`storage`]: Persistence backends for history entries.
/// - [`generator`]: Random sample report generation.
/// - [`config`]: Defaults and environment overrides.
pub mod analysis;
pub mod config;
pub mod generator;
pub mod history;
pub mod model;
pub mod storage;
pub mod workflow;

pub use analysis::{AnalysisError, AnalysisEvent, AnalysisHandle, Analyzer, CsvAnalyzer};
pub use config::AppConfig;
pub use history::HistoryStore;
pub use storage::{HistoryStorage, JsonFileStorage, MemoryStorage, SharedStorage, StorageError};
pub use workflow::{AnalysisStatus, AnalysisWorkflow};
