//! Message store port
//!
//! Durable storage for conversation messages. Rows are created by the Turn
//! Controller; `summary` is written only through [`MessageStore::apply_summaries`].

use async_trait::async_trait;
use parley_domain::{Message, MessageId, NewMessage, SessionId, SummaryUpdate, ToolCallResult};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Message not found: {0}")]
    NotFound(MessageId),

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Storage backend error: {0}")]
    Backend(String),

    /// The operation was abandoned because the process is shutting down.
    #[error("Storage operation aborted")]
    Aborted,
}

/// Turn-owned fields that may be written after a row exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageUpdate {
    ReasoningTrace(String),
    ToolCallResults(Vec<ToolCallResult>),
}

impl MessageUpdate {
    /// Column name, for logging.
    pub fn field(&self) -> &'static str {
        match self {
            MessageUpdate::ReasoningTrace(_) => "reasoning_trace",
            MessageUpdate::ToolCallResults(_) => "tool_call_results",
        }
    }
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a row and return its id.
    async fn create_message(&self, message: NewMessage) -> Result<MessageId, StorageError>;

    /// Write one turn-owned field of an existing row.
    async fn update_message(&self, id: MessageId, update: MessageUpdate)
    -> Result<(), StorageError>;

    async fn get_message(&self, id: MessageId) -> Result<Message, StorageError>;

    /// The `limit` most recent messages of a session, oldest first.
    async fn session_messages(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<Message>, StorageError>;

    /// Write summaries in one batch, only where no summary is stored yet.
    ///
    /// Returns the number of rows written.
    async fn apply_summaries(&self, updates: &[SummaryUpdate]) -> Result<usize, StorageError>;
}
