//! Summary model port

use async_trait::async_trait;
use parley_domain::Role;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryModelError {
    #[error("Summary request failed: {0}")]
    RequestFailed(String),

    #[error("Summary model returned no text")]
    EmptyOutput,
}

/// Language model used to compress long messages.
#[async_trait]
pub trait SummaryModel: Send + Sync {
    async fn summarize(&self, role: Role, content: &str) -> Result<String, SummaryModelError>;
}
