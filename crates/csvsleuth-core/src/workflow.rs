/// Analysis workflow: the session state of one file's analysis.
///
/// Lifecycle: `Idle -> Processing -> Completed | Error`. At most one run is in
/// flight per workflow; `submit` while processing is rejected, not queued.
///
/// The analysis collaborator reports back through a channel. The UI thread
/// calls [`AnalysisWorkflow::process_messages`] once per frame, which drains
/// that channel and dispatches to [`on_data`](AnalysisWorkflow::on_data),
/// [`on_complete`](AnalysisWorkflow::on_complete) and
/// [`on_error`](AnalysisWorkflow::on_error). Each terminal callback writes
/// one history entry; events arriving after a terminal are ignored.
use crate::analysis::{AnalysisEvent, AnalysisHandle, Analyzer, EVENT_CHANNEL_CAPACITY};
use crate::history::HistoryStore;
use crate::model::{Highlights, HistoryEntry, NewHistoryEntry, SelectedFile};
use crate::storage::{SharedStorage, StorageError};
use crossbeam_channel::TryRecvError;
use tracing::{debug, info, warn};

/// Maximum number of analysis events drained per `process_messages` call.
///
/// Equal to the channel capacity, so one frame can empty a full channel and
/// the worker never waits on the repaint rate.
pub const MAX_EVENTS_PER_FRAME: usize = EVENT_CHANNEL_CAPACITY;

/// Message recorded when the worker goes away without reporting a result.
pub const WORKER_LOST_MESSAGE: &str = "analysis worker stopped unexpectedly";

/// Lifecycle status of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    /// No run in progress; a file may or may not be selected.
    #[default]
    Idle,
    /// A run is in flight.
    Processing,
    /// The last run finished and `highlights` holds its result.
    Completed,
    /// The last run failed and `error` holds the reason.
    Error,
}

/// Transient state of the current analysis plus the storage it reports to.
pub struct AnalysisWorkflow {
    storage: SharedStorage,
    file: Option<SelectedFile>,
    status: AnalysisStatus,
    highlights: Option<Highlights>,
    error: Option<String>,
    handle: Option<AnalysisHandle>,
}

impl AnalysisWorkflow {
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            storage,
            file: None,
            status: AnalysisStatus::Idle,
            highlights: None,
            error: None,
            handle: None,
        }
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn highlights(&self) -> Option<&Highlights> {
        self.highlights.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_processing(&self) -> bool {
        self.status == AnalysisStatus::Processing
    }

    /// Whether [`submit`](Self::submit) would start a run right now.
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.is_processing()
    }

    /// Select a new input file and return to `Idle`.
    ///
    /// Any run still in flight for the previous file is abandoned.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.detach_run();
        info!("Selected {}", file.name);
        self.file = Some(file);
        self.status = AnalysisStatus::Idle;
        self.highlights = None;
        self.error = None;
    }

    /// Start analysing the selected file.
    ///
    /// Returns `false` without touching the analyzer when no file is
    /// selected or a run is already in flight.
    pub fn submit(&mut self, analyzer: &dyn Analyzer) -> bool {
        let Some(file) = self.file.as_ref() else {
            debug!("submit ignored: no file selected");
            return false;
        };
        if self.is_processing() {
            debug!("submit ignored: analysis of {} already running", file.name);
            return false;
        }

        info!("Submitting {} for analysis", file.name);
        let handle = analyzer.analyze(file);
        self.status = AnalysisStatus::Processing;
        self.highlights = None;
        self.error = None;
        self.handle = Some(handle);
        true
    }

    /// Streaming partial result. Ignored unless processing.
    pub fn on_data(&mut self, partial: Highlights) {
        if !self.is_processing() {
            debug!("on_data ignored in {:?}", self.status);
            return;
        }
        self.highlights = Some(partial);
    }

    /// Successful completion: record the result and write it to history.
    ///
    /// Outside `Processing` this is a no-op returning `Ok(None)`. The state
    /// transition happens before the storage write, so a storage error still
    /// leaves the session `Completed`.
    pub fn on_complete(
        &mut self,
        result: Highlights,
    ) -> Result<Option<HistoryEntry>, StorageError> {
        if !self.is_processing() {
            debug!("on_complete ignored in {:?}", self.status);
            return Ok(None);
        }
        self.handle = None;
        self.status = AnalysisStatus::Completed;
        self.highlights = Some(result.clone());
        self.error = None;

        let file_name = self.file_name();
        info!("Analysis of {file_name} completed");
        let entry = self
            .storage
            .add_entry(NewHistoryEntry::success(file_name, result))?;
        Ok(Some(entry))
    }

    /// Failure: record the message and write a result-less history entry.
    ///
    /// Same no-op and ordering rules as [`on_complete`](Self::on_complete).
    pub fn on_error(
        &mut self,
        message: impl Into<String>,
    ) -> Result<Option<HistoryEntry>, StorageError> {
        if !self.is_processing() {
            debug!("on_error ignored in {:?}", self.status);
            return Ok(None);
        }
        let message = message.into();
        self.handle = None;
        self.status = AnalysisStatus::Error;
        self.highlights = None;

        let file_name = self.file_name();
        warn!("Analysis of {file_name} failed: {message}");
        self.error = Some(message);
        let entry = self
            .storage
            .add_entry(NewHistoryEntry::failure(file_name))?;
        Ok(Some(entry))
    }

    /// Return to the initial state: no file, `Idle`, nothing recorded.
    pub fn reset(&mut self) {
        self.detach_run();
        self.file = None;
        self.status = AnalysisStatus::Idle;
        self.highlights = None;
        self.error = None;
    }

    /// Alias for [`reset`](Self::reset), used when the user dismisses the file.
    pub fn clear(&mut self) {
        self.reset();
    }

    /// Drain pending analysis events. Called once per frame.
    ///
    /// Partial snapshots supersede each other, so only the newest one drained
    /// this frame is applied. A terminal event ends the drain and is
    /// dispatched after that partial. After a terminal the history store is
    /// reloaded so it shows the entry just written. Returns `true` if
    /// anything changed.
    pub fn process_messages(&mut self, history: &mut HistoryStore) -> Result<bool, StorageError> {
        let Some(handle) = self.handle.as_ref() else {
            return Ok(false);
        };

        let mut latest_partial = None;
        let mut terminal = None;
        let mut lost = false;
        let mut handled = 0usize;

        while handled < MAX_EVENTS_PER_FRAME {
            match handle.events.try_recv() {
                Ok(event) => {
                    handled += 1;
                    if event.is_terminal() {
                        terminal = Some(event);
                        break;
                    }
                    if let AnalysisEvent::Partial(partial) = event {
                        latest_partial = Some(partial);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    lost = true;
                    break;
                }
            }
        }

        if handled > 1 {
            debug!("Drained {handled} analysis events");
        }
        if let Some(partial) = latest_partial {
            self.on_data(partial);
        }

        let recorded = match terminal {
            Some(AnalysisEvent::Complete(result)) => self.on_complete(result)?,
            Some(AnalysisEvent::Failed(message)) => self.on_error(message)?,
            _ if lost => {
                warn!("Analysis channel closed without a result");
                self.on_error(WORKER_LOST_MESSAGE)?
            }
            _ => None,
        };
        if recorded.is_some() {
            history.load_from_storage()?;
        }

        Ok(handled > 0 || lost)
    }

    fn file_name(&self) -> String {
        self.file
            .as_ref()
            .map(|f| f.name.clone())
            .unwrap_or_default()
    }

    /// Stop listening to the current run and ask its worker to stop.
    fn detach_run(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
            debug!("Abandoned in-flight analysis");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisSender;
    use crate::storage::{HistoryStorage, MemoryStorage};
    use std::cell::RefCell;
    use std::sync::Arc;

    /// Records every file it is asked to analyse and keeps the senders so
    /// the test can play the collaborator.
    #[derive(Default)]
    struct ScriptedAnalyzer {
        calls: RefCell<Vec<String>>,
        senders: RefCell<Vec<AnalysisSender>>,
    }

    impl ScriptedAnalyzer {
        fn calls(&self) -> usize {
            self.calls.borrow().len()
        }

        fn sender(&self) -> AnalysisSender {
            self.senders.borrow().last().cloned().expect("analyze was called")
        }
    }

    impl Analyzer for ScriptedAnalyzer {
        fn analyze(&self, file: &SelectedFile) -> AnalysisHandle {
            let (handle, sender) = AnalysisHandle::channel();
            self.calls.borrow_mut().push(file.name.clone());
            self.senders.borrow_mut().push(sender);
            handle
        }
    }

    fn setup() -> (Arc<MemoryStorage>, AnalysisWorkflow, HistoryStore) {
        let storage = Arc::new(MemoryStorage::new());
        let workflow = AnalysisWorkflow::new(storage.clone());
        let history = HistoryStore::new(storage.clone());
        (storage, workflow, history)
    }

    fn galactic(total: f64) -> Highlights {
        Highlights {
            total_spend_galactic: total,
            rows_affected: 50,
            less_spent_at: 100,
            big_spent_at: 300,
            less_spent_value: 50.0,
            big_spent_value: 200.0,
            average_spend_galactic: 150.0,
            big_spent_civ: "humans".into(),
            less_spent_civ: "aliens".into(),
        }
    }

    #[test]
    fn starts_idle_and_empty() {
        let (_, wf, _) = setup();
        assert_eq!(wf.status(), AnalysisStatus::Idle);
        assert!(wf.file().is_none());
        assert!(wf.highlights().is_none());
        assert!(wf.error().is_none());
        assert!(!wf.can_submit());
    }

    #[test]
    fn submit_without_file_is_noop() {
        let (_, mut wf, _) = setup();
        let analyzer = ScriptedAnalyzer::default();
        assert!(!wf.submit(&analyzer));
        assert_eq!(analyzer.calls(), 0);
        assert_eq!(wf.status(), AnalysisStatus::Idle);
    }

    #[test]
    fn submit_while_processing_is_noop() {
        let (_, mut wf, _) = setup();
        let analyzer = ScriptedAnalyzer::default();
        wf.select_file(SelectedFile::from_path("test.csv"));
        assert!(wf.submit(&analyzer));
        assert!(!wf.submit(&analyzer));
        assert_eq!(analyzer.calls(), 1);
        assert_eq!(wf.status(), AnalysisStatus::Processing);
    }

    #[test]
    fn select_file_resets_previous_outcome() {
        let (_, mut wf, _) = setup();
        let analyzer = ScriptedAnalyzer::default();
        wf.select_file(SelectedFile::from_path("a.csv"));
        wf.submit(&analyzer);
        wf.on_error("bad").unwrap();
        assert_eq!(wf.status(), AnalysisStatus::Error);

        wf.select_file(SelectedFile::from_path("b.csv"));
        assert_eq!(wf.status(), AnalysisStatus::Idle);
        assert!(wf.error().is_none());
        assert_eq!(wf.file().map(|f| f.name.as_str()), Some("b.csv"));
    }

    #[test]
    fn on_data_updates_highlights_only_while_processing() {
        let (_, mut wf, _) = setup();
        let analyzer = ScriptedAnalyzer::default();
        wf.on_data(galactic(1.0));
        assert!(wf.highlights().is_none());

        wf.select_file(SelectedFile::from_path("stream-test.csv"));
        wf.submit(&analyzer);
        wf.on_data(galactic(10.0));
        assert_eq!(wf.status(), AnalysisStatus::Processing);
        assert_eq!(wf.highlights().map(|h| h.total_spend_galactic), Some(10.0));
        wf.on_data(galactic(20.0));
        assert_eq!(wf.highlights().map(|h| h.total_spend_galactic), Some(20.0));
    }

    #[test]
    fn complete_records_success_entry() {
        let (storage, mut wf, _) = setup();
        let analyzer = ScriptedAnalyzer::default();
        wf.select_file(SelectedFile::from_path("test.csv"));
        wf.submit(&analyzer);

        let entry = wf.on_complete(galactic(1000.0)).unwrap().expect("recorded");
        assert_eq!(wf.status(), AnalysisStatus::Completed);
        assert_eq!(wf.highlights(), Some(&galactic(1000.0)));
        assert!(wf.error().is_none());

        let stored = storage.list_entries().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], entry);
        assert_eq!(stored[0].file_name, "test.csv");
        assert_eq!(stored[0].highlights, Some(galactic(1000.0)));
    }

    #[test]
    fn error_records_failure_entry() {
        let (storage, mut wf, _) = setup();
        let analyzer = ScriptedAnalyzer::default();
        wf.select_file(SelectedFile::from_path("error-test.csv"));
        wf.submit(&analyzer);
        wf.on_data(galactic(5.0));

        wf.on_error("Integration test error").unwrap();
        assert_eq!(wf.status(), AnalysisStatus::Error);
        assert_eq!(wf.error(), Some("Integration test error"));
        assert!(wf.highlights().is_none());

        let stored = storage.list_entries().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].file_name, "error-test.csv");
        assert!(stored[0].highlights.is_none());
    }

    #[test]
    fn second_terminal_is_noop() {
        let (storage, mut wf, _) = setup();
        let analyzer = ScriptedAnalyzer::default();
        wf.select_file(SelectedFile::from_path("test.csv"));
        wf.submit(&analyzer);
        wf.on_complete(galactic(1.0)).unwrap();

        assert!(wf.on_complete(galactic(2.0)).unwrap().is_none());
        assert!(wf.on_error("late").unwrap().is_none());
        wf.on_data(galactic(3.0));

        assert_eq!(wf.status(), AnalysisStatus::Completed);
        assert_eq!(wf.highlights(), Some(&galactic(1.0)));
        assert_eq!(storage.list_entries().unwrap().len(), 1);
    }

    #[test]
    fn terminal_without_submit_is_noop() {
        let (storage, mut wf, _) = setup();
        wf.select_file(SelectedFile::from_path("test.csv"));
        assert!(wf.on_complete(galactic(1.0)).unwrap().is_none());
        assert_eq!(wf.status(), AnalysisStatus::Idle);
        assert!(storage.list_entries().unwrap().is_empty());
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let (_, mut wf, _) = setup();
        let analyzer = ScriptedAnalyzer::default();
        wf.select_file(SelectedFile::from_path("test.csv"));
        wf.submit(&analyzer);
        let sender = analyzer.sender();

        wf.clear();
        assert_eq!(wf.status(), AnalysisStatus::Idle);
        assert!(wf.file().is_none());
        assert!(wf.highlights().is_none());
        assert!(sender.is_cancelled(), "in-flight run must be told to stop");
    }

    #[test]
    fn process_messages_drives_full_run() {
        let (storage, mut wf, mut history) = setup();
        let analyzer = ScriptedAnalyzer::default();
        wf.select_file(SelectedFile::from_path("test.csv"));
        wf.submit(&analyzer);
        let sender = analyzer.sender();

        sender.partial(galactic(10.0));
        assert!(wf.process_messages(&mut history).unwrap());
        assert_eq!(wf.status(), AnalysisStatus::Processing);
        assert_eq!(wf.highlights().map(|h| h.total_spend_galactic), Some(10.0));
        assert!(history.is_empty());

        sender.complete(galactic(1000.0));
        sender.fail("ignored after terminal");
        assert!(wf.process_messages(&mut history).unwrap());
        assert_eq!(wf.status(), AnalysisStatus::Completed);
        assert_eq!(history.len(), 1);
        assert_eq!(storage.list_entries().unwrap().len(), 1);

        assert!(!wf.process_messages(&mut history).unwrap());
        assert_eq!(wf.status(), AnalysisStatus::Completed);
    }

    #[test]
    fn burst_of_partials_collapses_to_the_newest() {
        let (_, mut wf, mut history) = setup();
        let analyzer = ScriptedAnalyzer::default();
        wf.select_file(SelectedFile::from_path("burst.csv"));
        wf.submit(&analyzer);
        let sender = analyzer.sender();

        for i in 1..=500 {
            sender.partial(galactic(i as f64));
        }
        assert!(wf.process_messages(&mut history).unwrap());
        assert_eq!(wf.highlights().map(|h| h.total_spend_galactic), Some(500.0));
        assert_eq!(wf.status(), AnalysisStatus::Processing);
        // Everything queued was consumed in a single frame.
        assert!(!wf.process_messages(&mut history).unwrap());
    }

    #[test]
    fn full_channel_drains_to_terminal_in_one_frame() {
        let (storage, mut wf, mut history) = setup();
        let analyzer = ScriptedAnalyzer::default();
        wf.select_file(SelectedFile::from_path("full.csv"));
        wf.submit(&analyzer);
        let sender = analyzer.sender();

        for i in 0..EVENT_CHANNEL_CAPACITY - 1 {
            sender.partial(galactic(i as f64));
        }
        sender.complete(galactic(1000.0));

        assert!(wf.process_messages(&mut history).unwrap());
        assert_eq!(wf.status(), AnalysisStatus::Completed);
        assert_eq!(wf.highlights(), Some(&galactic(1000.0)));
        assert_eq!(storage.list_entries().unwrap().len(), 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn disconnected_worker_is_recorded_as_failure() {
        let (storage, mut wf, mut history) = setup();
        let analyzer = ScriptedAnalyzer::default();
        wf.select_file(SelectedFile::from_path("lost.csv"));
        wf.submit(&analyzer);
        analyzer.senders.borrow_mut().clear();

        assert!(wf.process_messages(&mut history).unwrap());
        assert_eq!(wf.status(), AnalysisStatus::Error);
        assert_eq!(wf.error(), Some(WORKER_LOST_MESSAGE));
        assert_eq!(history.len(), 1);
        assert!(storage.list_entries().unwrap()[0].is_failure());
    }
}
