//! Summarization scheduler parameters.

use parley_domain::{DEFAULT_MIN_CONTENT_BYTES, SummaryPolicy};
use serde::{Deserialize, Serialize};

/// Scheduler sizing and selection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerParams {
    /// Number of worker loops.
    pub workers: usize,
    /// Bounded queue capacity.
    pub queue_capacity: usize,
    /// Summaries collected before one batched write.
    pub batch_size: usize,
    /// Content shorter than this (bytes) is not summarized.
    pub min_content_bytes: usize,
}

impl Default for SummarizerParams {
    fn default() -> Self {
        Self {
            workers: 10,
            queue_capacity: 100,
            batch_size: 1,
            min_content_bytes: DEFAULT_MIN_CONTENT_BYTES,
        }
    }
}

impl SummarizerParams {
    // ==================== Builder Methods ====================

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_min_content_bytes(mut self, bytes: usize) -> Self {
        self.min_content_bytes = bytes;
        self
    }

    pub fn policy(&self) -> SummaryPolicy {
        SummaryPolicy::new(self.min_content_bytes)
    }
}
