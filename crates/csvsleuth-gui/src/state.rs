/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes. The analysis
/// and generator threads communicate via channels; state updates happen in
/// `process_messages()` which runs once per frame.
///
/// Storage failures never abort a UI action. They are logged and surfaced in
/// `storage_error` until the user dismisses them.
use crossbeam_channel::TryRecvError;
use csvsleuth_core::generator::{self, GenerateHandle, GeneratorOptions};
use csvsleuth_core::model::{is_csv_file, HistoryEntry, SelectedFile};
use csvsleuth_core::storage::StorageError;
use csvsleuth_core::{
    AnalysisStatus, AnalysisWorkflow, AppConfig, CsvAnalyzer, HistoryStore, SharedStorage,
};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Shown when the user picks anything other than a `.csv` file.
pub const ONLY_CSV_MESSAGE: &str = "Only *.csv files can be uploaded";

/// Shown when the generator thread exits without reporting.
const GENERATOR_LOST_MESSAGE: &str = "report generator stopped unexpectedly";

/// Default file name for generated reports.
pub const DEFAULT_REPORT_NAME: &str = "report.csv";

/// Which page the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Upload,
    Generate,
    History,
}

/// Progress of the sample report generator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerateStatus {
    #[default]
    Idle,
    Running,
    /// The report was written to this path.
    Done(PathBuf),
    Failed(String),
}

/// All application state.
pub struct AppState {
    // ── Navigation ─────────────────────────────────────
    pub page: Page,

    // ── Analysis ───────────────────────────────────────
    pub workflow: AnalysisWorkflow,
    analyzer: CsvAnalyzer,
    /// Path typed into the upload drop zone.
    pub path_input: String,
    /// Rejected selection message, cleared by the next valid selection.
    pub validation_error: Option<String>,

    // ── History ────────────────────────────────────────
    pub history: HistoryStore,
    /// Last storage failure, shown in the status bar.
    pub storage_error: Option<String>,

    // ── Generator ──────────────────────────────────────
    pub generate_status: GenerateStatus,
    /// Destination typed on the generate page.
    pub generate_path: String,
    generate_handle: Option<GenerateHandle>,
    generator_rows: usize,

    // ── Theme ──────────────────────────────────────────
    /// `true` = dark mode (default), `false` = light mode.
    pub dark_mode: bool,
}

impl AppState {
    /// Create state backed by `storage`, tuned by `config`.
    ///
    /// History is not loaded here; it is loaded when the history page is
    /// first shown.
    pub fn new(config: &AppConfig, storage: SharedStorage) -> Self {
        let generate_path = config
            .history_path
            .parent()
            .map(|dir| dir.join(DEFAULT_REPORT_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_NAME));

        Self {
            page: Page::Upload,
            workflow: AnalysisWorkflow::new(storage.clone()),
            analyzer: CsvAnalyzer::new(config.rows_per_partial),
            path_input: String::new(),
            validation_error: None,
            history: HistoryStore::new(storage),
            storage_error: None,
            generate_status: GenerateStatus::Idle,
            generate_path: generate_path.to_string_lossy().into_owned(),
            generate_handle: None,
            generator_rows: config.generator_rows,
            dark_mode: true,
        }
    }

    /// Whether a background thread is running and the UI should keep
    /// repainting.
    pub fn is_busy(&self) -> bool {
        self.workflow.is_processing() || self.generate_status == GenerateStatus::Running
    }

    // ── Upload ────────────────────────────────────────────────────────────

    /// Select `path` as the file to analyse.
    ///
    /// Non-CSV paths are rejected with [`ONLY_CSV_MESSAGE`] and leave the
    /// current selection untouched.
    pub fn select_path(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if !is_csv_file(&path) {
            warn!("Rejected non-CSV selection {}", path.display());
            self.validation_error = Some(ONLY_CSV_MESSAGE.to_string());
            return false;
        }
        self.validation_error = None;
        self.path_input = path.to_string_lossy().into_owned();
        self.workflow.select_file(SelectedFile::from_path(path));
        true
    }

    /// Select whatever is typed in the path field.
    pub fn select_typed_path(&mut self) -> bool {
        let typed = self.path_input.trim().to_string();
        if typed.is_empty() {
            return false;
        }
        self.select_path(typed)
    }

    /// Start analysing the selected file.
    pub fn submit(&mut self) -> bool {
        self.workflow.submit(&self.analyzer)
    }

    /// Drop the selected file and any result.
    pub fn clear(&mut self) {
        self.workflow.clear();
        self.path_input.clear();
        self.validation_error = None;
    }

    /// Drain analysis and generator messages. Called once per frame.
    ///
    /// Returns `true` if the UI should repaint.
    pub fn process_messages(&mut self) -> bool {
        let analysis = self.workflow.process_messages(&mut self.history);
        let mut repaint = match analysis {
            Ok(changed) => changed,
            Err(e) => {
                self.note_storage_error(e, "save the analysis to history");
                true
            }
        };
        repaint |= self.process_generator_messages();
        repaint
    }

    // ── Navigation & history ──────────────────────────────────────────────

    /// Switch page. Entering the history page reloads it from storage.
    pub fn navigate(&mut self, page: Page) {
        if page == Page::History {
            self.reload_history();
        }
        self.page = page;
    }

    /// Replace the history list with what storage holds.
    pub fn reload_history(&mut self) {
        if let Err(e) = self.history.load_from_storage() {
            self.note_storage_error(e, "load history");
        }
    }

    /// Ask the viewer to show `entry`. Failed entries never open.
    pub fn open_entry(&mut self, entry: HistoryEntry) {
        self.history.select(entry);
    }

    pub fn dismiss_entry(&mut self) {
        self.history.dismiss();
    }

    pub fn remove_entry(&mut self, id: &str) {
        if let Err(e) = self.history.remove_one(id) {
            self.note_storage_error(e, "delete the history entry");
        }
    }

    pub fn clear_history(&mut self) {
        if let Err(e) = self.history.clear_all() {
            self.note_storage_error(e, "clear history");
        }
    }

    pub fn dismiss_storage_error(&mut self) {
        self.storage_error = None;
    }

    // ── Generator ─────────────────────────────────────────────────────────

    /// Start writing a sample report to `generate_path`.
    ///
    /// Returns `false` if a generation is already running.
    pub fn start_generate(&mut self) -> bool {
        if self.generate_status == GenerateStatus::Running {
            return false;
        }
        let target = self.generate_path.trim();
        if target.is_empty() {
            self.generate_status = GenerateStatus::Failed("Choose where to save the report".into());
            return false;
        }
        let options = GeneratorOptions {
            rows: self.generator_rows,
            seed: None,
        };
        self.generate_handle = Some(generator::start_generate(PathBuf::from(target), options));
        self.generate_status = GenerateStatus::Running;
        true
    }

    /// Select the report just generated and switch to the upload page.
    pub fn analyse_generated(&mut self) -> bool {
        let GenerateStatus::Done(path) = &self.generate_status else {
            return false;
        };
        let path = path.clone();
        let selected = self.select_path(path);
        self.navigate(Page::Upload);
        selected
    }

    fn process_generator_messages(&mut self) -> bool {
        let Some(handle) = self.generate_handle.as_ref() else {
            return false;
        };
        let outcome = match handle.result_rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(GENERATOR_LOST_MESSAGE.to_string()),
        };
        self.generate_handle = None;
        self.generate_status = match outcome {
            Ok(path) => {
                info!("Sample report ready at {}", path.display());
                GenerateStatus::Done(path)
            }
            Err(message) => GenerateStatus::Failed(message),
        };
        true
    }

    fn note_storage_error(&mut self, err: StorageError, action: &str) {
        let err = anyhow::Error::new(err).context(format!("Could not {action}"));
        let message = format!("{err:#}");
        error!("{message}");
        self.storage_error = Some(message);
    }
}

/// Human-readable phase label for the status bar.
pub fn status_label(status: AnalysisStatus) -> &'static str {
    match status {
        AnalysisStatus::Idle => "Ready",
        AnalysisStatus::Processing => "Analysing",
        AnalysisStatus::Completed => "Analysis complete",
        AnalysisStatus::Error => "Analysis failed",
    }
}
