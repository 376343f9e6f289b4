//! Input, output and error types for [`RunTurnUseCase`](super::RunTurnUseCase).

use crate::ports::agent::AgentError;
use crate::ports::message_store::StorageError;
use parley_domain::{DomainError, MessageId, SessionId, TurnOutcome};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that end a turn without a durable result.
#[derive(Error, Debug)]
pub enum RunTurnError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    #[error("Failed to load conversation memory: {0}")]
    MemoryUnavailable(StorageError),

    #[error("Agent failed: {0}")]
    Agent(AgentError),

    #[error("Failed to persist turn: {0}")]
    Persist(StorageError),

    #[error("Persistence task failed: {0}")]
    PersistTask(String),
}

/// Failure taxonomy for the fatal paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidRequest,
    TransportFailure,
    StorageFailure,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidRequest => "invalid_request",
            FailureKind::TransportFailure => "transport_failure",
            FailureKind::StorageFailure => "storage_failure",
        }
    }
}

impl RunTurnError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            RunTurnError::InvalidRequest(_) => FailureKind::InvalidRequest,
            RunTurnError::Agent(_) => FailureKind::TransportFailure,
            RunTurnError::MemoryUnavailable(_)
            | RunTurnError::Persist(_)
            | RunTurnError::PersistTask(_) => FailureKind::StorageFailure,
        }
    }
}

/// Input for the [`RunTurnUseCase`](super::RunTurnUseCase).
#[derive(Debug, Clone)]
pub struct RunTurnInput {
    pub session_id: SessionId,
    pub query: String,
}

impl RunTurnInput {
    pub fn new(session_id: SessionId, query: impl Into<String>) -> Self {
        Self {
            session_id,
            query: query.into(),
        }
    }
}

/// The two cancellation scopes of a turn.
///
/// `work` follows the caller: cancelling it stops the agent call and event
/// forwarding. `persist` is owned by the process and only fires on hard
/// shutdown; it is never derived from `work`, so a departed caller cannot
/// abort the save.
#[derive(Debug, Clone, Default)]
pub struct TurnScopes {
    pub work: CancellationToken,
    pub persist: CancellationToken,
}

impl TurnScopes {
    pub fn new(work: CancellationToken, persist: CancellationToken) -> Self {
        Self { work, persist }
    }
}

/// Result of a turn that was persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTurnOutput {
    pub outcome: TurnOutcome,
    pub user_message_id: MessageId,
    pub assistant_message_id: Option<MessageId>,
    pub answer: String,
}
