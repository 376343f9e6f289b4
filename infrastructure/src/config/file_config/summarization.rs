//! Summarization configuration from TOML (`[summarization]` section)

use parley_application::SummarizerParams;
use parley_domain::{ConfigIssue, ConfigIssueCode, DEFAULT_MIN_CONTENT_BYTES};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw summarization configuration from TOML
///
/// # Example
///
/// ```toml
/// [summarization]
/// enabled = true
/// model = "deepseek-v3"
/// workers = 10
/// queue_capacity = 100
/// batch_size = 1
/// min_content_bytes = 2500
/// shutdown_grace_seconds = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSummarizationConfig {
    /// Run the background summarizer at all
    pub enabled: bool,
    /// Summary model name (same endpoint and key as the agent)
    pub model: String,
    pub workers: usize,
    pub queue_capacity: usize,
    pub batch_size: usize,
    /// Content shorter than this (bytes) is not summarized
    pub min_content_bytes: usize,
    /// How long shutdown waits for workers to drain
    pub shutdown_grace_seconds: u64,
}

impl Default for FileSummarizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "deepseek-v3".to_string(),
            workers: 10,
            queue_capacity: 100,
            batch_size: 1,
            min_content_bytes: DEFAULT_MIN_CONTENT_BYTES,
            shutdown_grace_seconds: 30,
        }
    }
}

impl FileSummarizationConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModel,
                "summarization.model cannot be empty",
            ));
        }
        if self.workers == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroWorkers,
                "summarization.workers cannot be 0",
            ));
        }
        if self.queue_capacity == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroQueueCapacity,
                "summarization.queue_capacity cannot be 0",
            ));
        }
        if self.batch_size == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroBatchSize,
                "summarization.batch_size cannot be 0",
            ));
        }
        issues
    }

    pub fn to_summarizer_params(&self) -> SummarizerParams {
        SummarizerParams::default()
            .with_workers(self.workers)
            .with_queue_capacity(self.queue_capacity)
            .with_batch_size(self.batch_size)
            .with_min_content_bytes(self.min_content_bytes)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}
