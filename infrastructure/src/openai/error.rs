//! Error types for the OpenAI-compatible adapter

use parley_application::{AgentError, SummaryModelError};
use thiserror::Error;

/// Result type alias for OpenAI-compatible API operations
pub type Result<T> = std::result::Result<T, OpenAiError>;

/// Errors that can occur when talking to an OpenAI-compatible endpoint
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stream reported an error: {0}")]
    Stream(String),

    #[error("Response contained no choices")]
    NoChoices,
}

impl From<OpenAiError> for AgentError {
    fn from(e: OpenAiError) -> Self {
        match e {
            OpenAiError::MissingApiKey(_) => AgentError::Other(e.to_string()),
            _ => AgentError::Transport(e.to_string()),
        }
    }
}

impl From<OpenAiError> for SummaryModelError {
    fn from(e: OpenAiError) -> Self {
        SummaryModelError::RequestFailed(e.to_string())
    }
}
