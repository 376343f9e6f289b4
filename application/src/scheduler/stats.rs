//! Scheduler counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by the queue and every worker.
#[derive(Debug, Default)]
pub struct SchedulerStats {
    enqueued: AtomicU64,
    dropped: AtomicU64,
    processed: AtomicU64,
    summaries_written: AtomicU64,
    flush_failures: AtomicU64,
}

impl SchedulerStats {
    pub(crate) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_written(&self, rows: usize) {
        self.summaries_written.fetch_add(rows as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_flush_failure(&self) {
        self.flush_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            summaries_written: self.summaries_written.load(Ordering::Relaxed),
            flush_failures: self.flush_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`SchedulerStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    /// Tasks accepted by the queue.
    pub enqueued: u64,
    /// Tasks refused because the queue was full or closed.
    pub dropped: u64,
    /// Tasks a worker finished.
    pub processed: u64,
    /// Rows that received a summary.
    pub summaries_written: u64,
    /// Batched writes that failed.
    pub flush_failures: u64,
}

/// What one worker did before it exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub tasks: u64,
    pub summarized: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl WorkerReport {
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = SchedulerStats::default();
        stats.record_enqueued();
        stats.record_enqueued();
        stats.record_dropped();
        stats.record_written(3);
        let snap = stats.snapshot();
        assert_eq!(snap.enqueued, 2);
        assert_eq!(snap.dropped, 1);
        assert_eq!(snap.summaries_written, 3);
        assert_eq!(snap.processed, 0);
    }
}
