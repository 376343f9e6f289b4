//! Structured configuration issues.
//!
//! Validation never fails outright: it returns every issue it finds, each
//! with a severity, so callers can print warnings and refuse to start only
//! on errors.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `agent.answer_marker` is empty.
    EmptyAnswerMarker,
    /// `agent.lookahead_chars` is below `marker_chars - 1` and will be raised.
    LookaheadBelowMarker,
    /// `agent.timeout_seconds` is zero.
    ZeroTimeout,
    /// A model name is empty.
    EmptyModel,
    /// `summarization.workers` is zero.
    ZeroWorkers,
    /// `summarization.queue_capacity` is zero.
    ZeroQueueCapacity,
    /// `summarization.batch_size` is zero.
    ZeroBatchSize,
    /// `agent.history_limit` is zero; the agent sees no prior turns.
    NoHistory,
    /// `agent.tools` names a tool that does not exist.
    UnknownTool,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Whether any issue in `issues` is fatal.
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
