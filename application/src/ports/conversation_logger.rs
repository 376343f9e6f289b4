//! Conversation transcript port
//!
//! Each turn leaves one machine-readable record of how it ended, next to the
//! diagnostic `tracing` output.

use parley_domain::{MessageId, SessionId, TurnOutcome};
use serde_json::{Value, json};

/// How one turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    TurnCompleted {
        session_id: SessionId,
        outcome: TurnOutcome,
        user_message_id: MessageId,
        assistant_message_id: Option<MessageId>,
        answer_bytes: usize,
        reasoning_bytes: usize,
    },
    TurnFailed {
        session_id: SessionId,
        /// Failure class, e.g. `transport_failure`
        kind: &'static str,
        error: String,
    },
}

impl ConversationEvent {
    /// Record type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            ConversationEvent::TurnCompleted { .. } => "turn_completed",
            ConversationEvent::TurnFailed { .. } => "turn_failed",
        }
    }

    pub fn session_id(&self) -> &SessionId {
        match self {
            ConversationEvent::TurnCompleted { session_id, .. }
            | ConversationEvent::TurnFailed { session_id, .. } => session_id,
        }
    }

    /// Event fields as a JSON object.
    pub fn payload(&self) -> Value {
        match self {
            ConversationEvent::TurnCompleted {
                session_id,
                outcome,
                user_message_id,
                assistant_message_id,
                answer_bytes,
                reasoning_bytes,
            } => json!({
                "session_id": session_id.as_str(),
                "outcome": outcome.as_str(),
                "user_message_id": user_message_id.get(),
                "assistant_message_id": assistant_message_id.map(MessageId::get),
                "answer_bytes": answer_bytes,
                "reasoning_bytes": reasoning_bytes,
            }),
            ConversationEvent::TurnFailed {
                session_id,
                kind,
                error,
            } => json!({
                "session_id": session_id.as_str(),
                "kind": kind,
                "error": error,
            }),
        }
    }
}

/// Records conversation events.
///
/// `log` is synchronous and infallible; implementations deal with their own
/// write failures.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
