//! Turn parameters
//!
//! [`TurnParams`] groups the static parameters that control
//! [`RunTurnUseCase`](crate::use_cases::run_turn::RunTurnUseCase).

use parley_domain::{
    DEFAULT_ANSWER_MARKER, DEFAULT_HISTORY_LIMIT, DEFAULT_LOOKAHEAD_CHARS, DomainError,
    StreamDemultiplexer,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on one agent call.
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(300);

/// Turn Controller parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnParams {
    /// Literal text that introduces the final answer.
    pub answer_marker: String,
    /// Characters held back while searching for the marker.
    pub lookahead_chars: usize,
    /// Messages of session history sent with every query.
    pub history_limit: usize,
    /// Upper bound on one agent call.
    pub agent_timeout: Duration,
}

impl Default for TurnParams {
    fn default() -> Self {
        Self {
            answer_marker: DEFAULT_ANSWER_MARKER.to_string(),
            lookahead_chars: DEFAULT_LOOKAHEAD_CHARS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            agent_timeout: DEFAULT_AGENT_TIMEOUT,
        }
    }
}

impl TurnParams {
    // ==================== Builder Methods ====================

    pub fn with_answer_marker(mut self, marker: impl Into<String>) -> Self {
        self.answer_marker = marker.into();
        self
    }

    pub fn with_lookahead_chars(mut self, chars: usize) -> Self {
        self.lookahead_chars = chars;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    /// A fresh demultiplexer for one turn.
    pub fn demultiplexer(&self) -> Result<StreamDemultiplexer, DomainError> {
        StreamDemultiplexer::new(self.answer_marker.clone(), self.lookahead_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = TurnParams::default();
        assert_eq!(params.answer_marker, "AI:");
        assert_eq!(params.lookahead_chars, 10);
        assert_eq!(params.history_limit, 200);
        assert_eq!(params.agent_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_builder() {
        let params = TurnParams::default()
            .with_answer_marker("Answer:")
            .with_lookahead_chars(3)
            .with_history_limit(20)
            .with_agent_timeout(Duration::from_secs(5));

        assert_eq!(params.history_limit, 20);
        assert_eq!(params.agent_timeout, Duration::from_secs(5));
        // raised to marker length - 1
        assert_eq!(params.demultiplexer().unwrap().lookahead(), 6);
    }

    #[test]
    fn test_empty_marker_fails_demultiplexer() {
        let params = TurnParams::default().with_answer_marker("");
        assert!(params.demultiplexer().is_err());
    }
}
