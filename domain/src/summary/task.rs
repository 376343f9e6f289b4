//! Summarization work items.

use crate::message::entities::MessageId;

/// A request to summarize the messages of one completed turn.
///
/// Consumed exactly once by one worker; never requeued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTask {
    message_ids: Vec<MessageId>,
}

impl SummaryTask {
    pub fn new(message_ids: Vec<MessageId>) -> Self {
        Self { message_ids }
    }

    /// Task for a turn: the user row, then the assistant row when one exists.
    pub fn for_turn(user: MessageId, assistant: Option<MessageId>) -> Self {
        Self::new(std::iter::once(user).chain(assistant).collect())
    }

    pub fn message_ids(&self) -> &[MessageId] {
        &self.message_ids
    }

    pub fn is_empty(&self) -> bool {
        self.message_ids.is_empty()
    }
}

/// A summary ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryUpdate {
    pub message_id: MessageId,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_turn_orders_user_first() {
        let task = SummaryTask::for_turn(MessageId::new(7), Some(MessageId::new(8)));
        assert_eq!(task.message_ids(), &[MessageId::new(7), MessageId::new(8)]);
    }

    #[test]
    fn test_for_turn_without_answer() {
        let task = SummaryTask::for_turn(MessageId::new(7), None);
        assert_eq!(task.message_ids(), &[MessageId::new(7)]);
        assert!(!task.is_empty());
    }
}
