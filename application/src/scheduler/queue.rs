//! Producer side of the summarization queue.

use super::stats::SchedulerStats;
use crate::ports::summary_dispatch::SummaryTaskDispatcher;
use parley_domain::SummaryTask;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Summary queue is full")]
    Saturated,

    #[error("Summary queue is closed")]
    Closed,
}

/// Cloneable handle for submitting [`SummaryTask`]s.
///
/// [`try_register`](Self::try_register) never waits; [`enqueue`](Self::enqueue)
/// waits for room. The [`SummaryTaskDispatcher`] impl uses the non-blocking
/// path and drops (with a warning) what does not fit.
#[derive(Clone)]
pub struct SummaryQueue {
    tx: mpsc::Sender<SummaryTask>,
    closed: CancellationToken,
    stats: Arc<SchedulerStats>,
}

impl SummaryQueue {
    pub(crate) fn new(
        tx: mpsc::Sender<SummaryTask>,
        closed: CancellationToken,
        stats: Arc<SchedulerStats>,
    ) -> Self {
        Self { tx, closed, stats }
    }

    /// Submit without waiting.
    pub fn try_register(&self, task: SummaryTask) -> Result<(), SchedulerError> {
        if self.closed.is_cancelled() {
            return Err(SchedulerError::Closed);
        }
        match self.tx.try_send(task) {
            Ok(()) => {
                self.stats.record_enqueued();
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(SchedulerError::Saturated),
            Err(TrySendError::Closed(_)) => Err(SchedulerError::Closed),
        }
    }

    /// Submit, waiting while the queue is full.
    ///
    /// Fails once the queue has been closed.
    pub async fn enqueue(&self, task: SummaryTask) -> Result<(), SchedulerError> {
        if self.closed.is_cancelled() {
            return Err(SchedulerError::Closed);
        }
        self.tx
            .send(task)
            .await
            .map_err(|_| SchedulerError::Closed)?;
        self.stats.record_enqueued();
        Ok(())
    }

    /// Free slots right now.
    pub fn remaining_capacity(&self) -> usize {
        self.tx.capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled() || self.tx.is_closed()
    }
}

impl SummaryTaskDispatcher for SummaryQueue {
    fn register(&self, task: SummaryTask) {
        let ids: Vec<i64> = task.message_ids().iter().map(|id| id.get()).collect();
        if let Err(e) = self.try_register(task) {
            self.stats.record_dropped();
            warn!(message_ids = ?ids, error = %e, "Summary task dropped");
        }
    }
}
