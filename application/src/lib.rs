//! Application layer for parley
//!
//! This crate contains use cases, port definitions, the summarization
//! scheduler and application configuration. It depends only on the domain
//! layer.

pub mod config;
pub mod ports;
pub mod scheduler;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{SummarizerParams, TurnParams};
pub use ports::{
    agent::{AgentError, AgentPort, AgentRequest, TokenSink},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    event_sink::{EventSink, NoEventSink},
    message_store::{MessageStore, MessageUpdate, StorageError},
    session_store::SessionStore,
    summary_dispatch::{NoSummaryDispatch, SummaryTaskDispatcher},
    summary_model::{SummaryModel, SummaryModelError},
    tool_executor::{NoTools, ToolExecutorPort},
};
pub use scheduler::{
    SchedulerError, SchedulerHandle, StatsSnapshot, SummarizationScheduler, SummaryQueue,
    WorkerReport,
};
pub use use_cases::manage_sessions::{ManageSessionsUseCase, SessionError};
pub use use_cases::run_turn::{
    FailureKind, RunTurnError, RunTurnInput, RunTurnOutput, RunTurnUseCase, TurnScopes,
};
