//! Summary task dispatch port

use parley_domain::SummaryTask;

/// Hands a [`SummaryTask`] to the background summarizer.
///
/// Fire-and-forget: implementations must return immediately. A task that
/// cannot be accepted is dropped and logged by the implementation.
pub trait SummaryTaskDispatcher: Send + Sync {
    fn register(&self, task: SummaryTask);
}

/// Drops every task. Used when summarization is disabled.
pub struct NoSummaryDispatch;

impl SummaryTaskDispatcher for NoSummaryDispatch {
    fn register(&self, _task: SummaryTask) {}
}
