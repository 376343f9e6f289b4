//! Agent port
//!
//! Defines the interface for the language-model agent that answers a query.
//! The agent streams its raw output through a [`TokenSink`] while it runs.

use async_trait::async_trait;
use parley_domain::{ConversationMemory, SessionId, ToolCallResult};
use thiserror::Error;

/// Errors that can occur during an agent call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// The final output did not contain a well-formed answer.
    ///
    /// `partial` is the raw output the agent produced.
    #[error("Unable to parse agent output")]
    UnableToParseOutput { partial: String },

    #[error("Agent call cancelled")]
    Cancelled,

    #[error("Agent call timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Agent error: {0}")]
    Other(String),
}

impl AgentError {
    /// Parse failures and cancellation still persist what was streamed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AgentError::UnableToParseOutput { .. } | AgentError::Cancelled
        )
    }
}

/// Everything the agent needs for one turn.
#[derive(Debug, Clone)]
pub struct AgentRequest {
    pub session_id: SessionId,
    pub query: String,
    /// Recent session history, oldest first.
    pub memory: ConversationMemory,
    /// Marker the agent must write before its final answer.
    pub answer_marker: String,
}

/// Receives the agent's output while the call is in progress.
///
/// Calls arrive in output order. Implementations must not block.
pub trait TokenSink: Send {
    /// One raw chunk of model output.
    fn on_token(&mut self, chunk: &str);

    /// Results of one tool invocation.
    fn on_tool_result(&mut self, _result: ToolCallResult) {}
}

/// Language-model agent
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait AgentPort: Send + Sync {
    /// Run the agent for `request`, streaming every chunk into `sink`.
    ///
    /// Returns the complete output on success.
    async fn run(
        &self,
        request: &AgentRequest,
        sink: &mut dyn TokenSink,
    ) -> Result<String, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(
            AgentError::UnableToParseOutput {
                partial: String::new()
            }
            .is_recoverable()
        );
        assert!(AgentError::Cancelled.is_recoverable());
        assert!(!AgentError::Timeout.is_recoverable());
        assert!(!AgentError::Transport("reset".into()).is_recoverable());
        assert!(!AgentError::Other("x".into()).is_recoverable());
    }
}
