/// Analysis module: the collaborator that turns a CSV file into highlights.
///
/// The workflow only sees the [`Analyzer`] trait. [`CsvAnalyzer`] is the
/// real implementation: it reads the file on a background thread and streams
/// [`AnalysisEvent`]s back through a bounded crossbeam channel that the UI
/// thread drains once per frame.
pub mod aggregator;
pub mod progress;
pub mod reader;

pub use aggregator::Aggregator;
pub use progress::AnalysisEvent;
pub use reader::analyse_file;

use crate::model::{Highlights, SelectedFile};
use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

/// Maximum number of events that may queue up in the channel.
///
/// The UI drains the channel every frame; if it falls behind, the worker
/// blocks on `send` instead of buffering partial snapshots without bound.
pub const EVENT_CHANNEL_CAPACITY: usize = 1_024;

/// Default number of rows between two partial snapshots.
pub const DEFAULT_ROWS_PER_PARTIAL: usize = 10_000;

/// Reasons an analysis run can fail.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("cannot read header row: {0}")]
    Header(#[source] csv::Error),
    #[error("required column `{0}` is missing")]
    MissingColumn(&'static str),
    #[error("line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },
    #[error("line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("file contains no data rows")]
    Empty,
    #[error("failed to start analysis worker: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Handle to a running or finished analysis.
///
/// Dropping the handle does not stop the worker; call [`cancel`](Self::cancel)
/// first if the result is no longer wanted.
pub struct AnalysisHandle {
    /// Receiver for events from the analysis thread.
    pub events: Receiver<AnalysisEvent>,
    cancel_flag: Arc<AtomicBool>,
    _thread: Option<thread::JoinHandle<()>>,
}

impl AnalysisHandle {
    /// Create a handle and the sender half that feeds it.
    ///
    /// Used by [`CsvAnalyzer`] and by any other [`Analyzer`] implementation
    /// (including test doubles) that wants to deliver events.
    pub fn channel() -> (Self, AnalysisSender) {
        let (tx, rx) = crossbeam_channel::bounded::<AnalysisEvent>(EVENT_CHANNEL_CAPACITY);
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let sender = AnalysisSender {
            tx,
            cancel_flag: cancel_flag.clone(),
        };
        let handle = Self {
            events: rx,
            cancel_flag,
            _thread: None,
        };
        (handle, sender)
    }

    /// Request the run to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}

/// Sending half of an [`AnalysisHandle`].
#[derive(Clone)]
pub struct AnalysisSender {
    tx: Sender<AnalysisEvent>,
    cancel_flag: Arc<AtomicBool>,
}

impl AnalysisSender {
    /// Deliver an event. Returns `false` if the handle has been dropped.
    pub fn send(&self, event: AnalysisEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn partial(&self, highlights: Highlights) -> bool {
        self.send(AnalysisEvent::Partial(highlights))
    }

    pub fn complete(&self, highlights: Highlights) -> bool {
        self.send(AnalysisEvent::Complete(highlights))
    }

    pub fn fail(&self, message: impl Into<String>) -> bool {
        self.send(AnalysisEvent::Failed(message.into()))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}

/// Something that can analyse a selected file.
///
/// `analyze` must return immediately; results arrive on the handle's channel.
pub trait Analyzer {
    fn analyze(&self, file: &SelectedFile) -> AnalysisHandle;
}

/// Reads CSV spend reports on a background thread.
#[derive(Debug, Clone)]
pub struct CsvAnalyzer {
    rows_per_partial: usize,
}

impl Default for CsvAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS_PER_PARTIAL)
    }
}

impl CsvAnalyzer {
    /// `rows_per_partial = 0` disables partial snapshots.
    pub fn new(rows_per_partial: usize) -> Self {
        Self { rows_per_partial }
    }
}

impl Analyzer for CsvAnalyzer {
    fn analyze(&self, file: &SelectedFile) -> AnalysisHandle {
        let (mut handle, sender) = AnalysisHandle::channel();
        let path = file.path.clone();
        let rows_per_partial = self.rows_per_partial;
        let worker_sender = sender.clone();

        let spawned = thread::Builder::new()
            .name("csvsleuth-analysis".into())
            .spawn(move || {
                info!("Starting analysis of {}", path.display());
                let sender = worker_sender;
                let result = analyse_file(&path, rows_per_partial, &sender.cancel_flag, |h| {
                    sender.partial(h);
                });
                match result {
                    Ok(Some(highlights)) => {
                        info!(
                            "Analysis of {} finished: {} rows",
                            path.display(),
                            highlights.rows_affected
                        );
                        sender.complete(highlights);
                    }
                    Ok(None) => info!("Analysis of {} cancelled", path.display()),
                    Err(e) => {
                        warn!("Analysis of {} failed: {e}", path.display());
                        sender.fail(e.to_string());
                    }
                }
            });

        match spawned {
            Ok(thread) => handle._thread = Some(thread),
            Err(e) => {
                warn!("Could not spawn analysis thread: {e}");
                sender.fail(AnalysisError::Spawn(e).to_string());
            }
        }
        handle
    }
}
