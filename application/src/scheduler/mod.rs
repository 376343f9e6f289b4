//! Summarization scheduler.
//!
//! A fixed pool of workers drains one bounded queue of [`SummaryTask`]s. For
//! each message id a worker loads the row, applies the [`SummaryPolicy`],
//! asks the [`SummaryModel`] for a summary and collects the result into a
//! batch that is written with one conditional store call.
//!
//! ```text
//! RunTurnUseCase ──try_register──▶ [ bounded mpsc ] ──▶ worker 1..N ──▶ MessageStore
//!                                                          │
//!                                                          └──▶ SummaryModel
//! ```
//!
//! Lifecycle is explicit: [`SummarizationScheduler::start`] spawns the
//! workers and returns a [`SchedulerHandle`]; [`SchedulerHandle::shutdown`]
//! closes the queue, lets the workers drain what is buffered, flushes their
//! batches and returns one [`WorkerReport`] per worker.
//!
//! [`SummaryPolicy`]: parley_domain::SummaryPolicy

mod queue;
mod stats;
mod worker;

pub use queue::{SchedulerError, SummaryQueue};
pub use stats::{SchedulerStats, StatsSnapshot, WorkerReport};

use crate::config::SummarizerParams;
use crate::ports::message_store::MessageStore;
use crate::ports::summary_model::SummaryModel;
use parley_domain::SummaryTask;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use worker::{WorkerContext, run_worker};

/// Builds and starts the worker pool.
pub struct SummarizationScheduler {
    store: Arc<dyn MessageStore>,
    model: Arc<dyn SummaryModel>,
    params: SummarizerParams,
}

impl SummarizationScheduler {
    pub fn new(
        store: Arc<dyn MessageStore>,
        model: Arc<dyn SummaryModel>,
        params: SummarizerParams,
    ) -> Self {
        Self {
            store,
            model,
            params,
        }
    }

    /// Spawn the workers on the current runtime.
    pub fn start(self) -> SchedulerHandle {
        let workers = self.params.workers.max(1);
        let capacity = self.params.queue_capacity.max(1);

        let (tx, rx) = mpsc::channel(capacity);
        let rx = Arc::new(Mutex::new(rx));
        let closed = CancellationToken::new();
        let stats = Arc::new(SchedulerStats::default());

        let ctx = Arc::new(WorkerContext {
            store: self.store,
            model: self.model,
            policy: self.params.policy(),
            batch_size: self.params.batch_size.max(1),
            stats: stats.clone(),
        });

        let handles = (1..=workers)
            .map(|id| tokio::spawn(run_worker(id, rx.clone(), closed.clone(), ctx.clone())))
            .collect();

        info!(workers, capacity, "Summarization scheduler started");

        SchedulerHandle {
            queue: SummaryQueue::new(tx, closed.clone(), stats.clone()),
            closed,
            stats,
            workers: handles,
        }
    }
}

/// Running scheduler.
pub struct SchedulerHandle {
    queue: SummaryQueue,
    closed: CancellationToken,
    stats: Arc<SchedulerStats>,
    workers: Vec<JoinHandle<WorkerReport>>,
}

impl SchedulerHandle {
    /// Non-blocking dispatcher for producers.
    pub fn queue(&self) -> SummaryQueue {
        self.queue.clone()
    }

    /// Submit a task, waiting while the queue is full.
    pub async fn enqueue(&self, task: SummaryTask) -> Result<(), SchedulerError> {
        self.queue.enqueue(task).await
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Close the queue, drain it, flush every batch and wait for the workers.
    pub async fn shutdown(self) -> Vec<WorkerReport> {
        self.closed.cancel();
        info!("Summarization scheduler shutting down");

        let mut reports = Vec::with_capacity(self.workers.len());
        for handle in self.workers {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => error!(error = %e, "Summary worker terminated abnormally"),
            }
        }

        let stats = self.stats.snapshot();
        info!(
            processed = stats.processed,
            written = stats.summaries_written,
            dropped = stats.dropped,
            "Summarization scheduler stopped"
        );
        reports
    }
}
