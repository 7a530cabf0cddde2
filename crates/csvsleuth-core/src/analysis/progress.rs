/// Analysis progress reporting: messages sent from the analysis thread to
/// the UI thread via a crossbeam channel.
///
/// Protocol: zero or more [`AnalysisEvent::Partial`], then exactly one of
/// [`AnalysisEvent::Complete`] or [`AnalysisEvent::Failed`]. A cancelled run
/// stops sending without a terminal event.
use crate::model::Highlights;

/// Events emitted by an analysis run.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEvent {
    /// Highlights over the rows read so far.
    Partial(Highlights),
    /// Final highlights over the whole file.
    Complete(Highlights),
    /// The run failed; the message is suitable for display.
    Failed(String),
}

impl AnalysisEvent {
    /// `true` for `Complete` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Partial(_))
    }
}
