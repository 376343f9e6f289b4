//! Worker loop.

use super::stats::{SchedulerStats, WorkerReport};
use crate::ports::message_store::MessageStore;
use crate::ports::summary_model::{SummaryModel, SummaryModelError};
use parley_domain::{MessageId, SkipReason, SummaryPolicy, SummaryTask, SummaryUpdate};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Dependencies shared by every worker.
pub(crate) struct WorkerContext {
    pub store: Arc<dyn MessageStore>,
    pub model: Arc<dyn SummaryModel>,
    pub policy: SummaryPolicy,
    pub batch_size: usize,
    pub stats: Arc<SchedulerStats>,
}

pub(crate) async fn run_worker(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<SummaryTask>>>,
    closed: CancellationToken,
    ctx: Arc<WorkerContext>,
) -> WorkerReport {
    info!(worker_id, "Summary worker started");

    let mut worker = Worker {
        report: WorkerReport::new(worker_id),
        pending: Vec::with_capacity(ctx.batch_size),
        ctx,
    };

    while let Some(task) = next_task(&rx, &closed).await {
        worker.process(&task).await;
        worker.report.tasks += 1;
        worker.ctx.stats.record_processed();
    }

    worker.flush().await;
    info!(
        worker_id,
        tasks = worker.report.tasks,
        summarized = worker.report.summarized,
        "Summary worker exited"
    );
    worker.report
}

/// Receive the next task; once `closed` fires, close the channel and drain it.
async fn next_task(
    rx: &Mutex<mpsc::Receiver<SummaryTask>>,
    closed: &CancellationToken,
) -> Option<SummaryTask> {
    let mut rx = rx.lock().await;
    tokio::select! {
        biased;
        task = rx.recv() => task,
        _ = closed.cancelled() => {
            rx.close();
            rx.recv().await
        }
    }
}

enum Attempt {
    Summarized(SummaryUpdate),
    Skipped,
    Failed,
}

struct Worker {
    report: WorkerReport,
    pending: Vec<SummaryUpdate>,
    ctx: Arc<WorkerContext>,
}

impl Worker {
    async fn process(&mut self, task: &SummaryTask) {
        for &id in task.message_ids() {
            match self.summarize(id).await {
                Attempt::Summarized(update) => {
                    self.pending.push(update);
                    if self.pending.len() >= self.ctx.batch_size {
                        self.flush().await;
                    }
                }
                Attempt::Skipped => self.report.skipped += 1,
                Attempt::Failed => self.report.failed += 1,
            }
        }
    }

    async fn summarize(&self, id: MessageId) -> Attempt {
        let worker_id = self.report.worker_id;
        let message = match self.ctx.store.get_message(id).await {
            Ok(message) => message,
            Err(e) => {
                warn!(worker_id, message_id = %id, error = %e, "Failed to load message");
                return Attempt::Failed;
            }
        };

        if let Err(reason) = self.ctx.policy.check(&message) {
            let reason = match reason {
                SkipReason::TooShort => "too short",
                SkipReason::AlreadySummarized => "already summarized",
            };
            debug!(worker_id, message_id = %id, reason, "Skipping summary");
            return Attempt::Skipped;
        }

        let result = self
            .ctx
            .model
            .summarize(message.role, &message.content)
            .await
            .and_then(|s| match s.trim() {
                "" => Err(SummaryModelError::EmptyOutput),
                trimmed => Ok(trimmed.to_string()),
            });

        match result {
            Ok(summary) => Attempt::Summarized(SummaryUpdate {
                message_id: id,
                summary,
            }),
            Err(e) => {
                warn!(worker_id, message_id = %id, error = %e, "Failed to summarize message");
                Attempt::Failed
            }
        }
    }

    async fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);
        match self.ctx.store.apply_summaries(&batch).await {
            Ok(written) => {
                self.report.summarized += written as u64;
                self.ctx.stats.record_written(written);
                debug!(
                    worker_id = self.report.worker_id,
                    batch = batch.len(),
                    written,
                    "Flushed summaries"
                );
            }
            Err(e) => {
                self.ctx.stats.record_flush_failure();
                self.report.failed += batch.len() as u64;
                error!(
                    worker_id = self.report.worker_id,
                    batch = batch.len(),
                    error = %e,
                    "Failed to flush summaries"
                );
            }
        }
    }
}
