//! Conversation memory reconstruction.
//!
//! The agent receives the session's recent messages with every query.
//! Summarized messages contribute their summary instead of the full content,
//! which keeps long sessions inside the model's context window.

use super::entities::{Message, Role};

/// Default number of most recent messages loaded as memory.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// One remembered exchange line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    pub role: Role,
    pub text: String,
}

/// Chronological conversation memory for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationMemory {
    entries: Vec<MemoryEntry>,
}

impl ConversationMemory {
    /// Build memory from stored messages, preserving their order.
    ///
    /// Messages with nothing to say (empty content and no summary) are skipped.
    pub fn from_messages(messages: &[Message]) -> Self {
        let entries = messages
            .iter()
            .filter(|m| !m.memory_text().is_empty())
            .map(|m| MemoryEntry {
                role: m.role,
                text: m.memory_text().to_string(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[MemoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
