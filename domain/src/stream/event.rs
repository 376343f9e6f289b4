//! Events forwarded to the caller during a turn.
//!
//! [`TurnEvent`] is what the transport sees. Every turn produces zero or more
//! chunk events, optionally one [`TurnEvent::Error`], and exactly one
//! [`TurnEvent::Terminal`] as its last event.

use super::demux::DemuxEvent;
use crate::message::entities::ToolCallResult;

/// An event in a turn's live output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// Intermediate reasoning text.
    ReasoningChunk(String),
    /// Final answer text.
    AnswerChunk(String),
    /// Results of one tool invocation made by the agent.
    ToolCallResult(ToolCallResult),
    /// A fatal failure; always followed by `Terminal`.
    Error(String),
    /// End of the turn.
    Terminal,
}

impl TurnEvent {
    /// Wire name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            TurnEvent::ReasoningChunk(_) => "reasoning_chunk",
            TurnEvent::AnswerChunk(_) => "answer_chunk",
            TurnEvent::ToolCallResult(_) => "tool_call_result",
            TurnEvent::Error(_) => "error",
            TurnEvent::Terminal => "terminal",
        }
    }

    /// Returns the text payload of chunk and error events.
    pub fn text(&self) -> Option<&str> {
        match self {
            TurnEvent::ReasoningChunk(s) | TurnEvent::AnswerChunk(s) | TurnEvent::Error(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnEvent::Terminal)
    }
}

impl From<DemuxEvent> for TurnEvent {
    fn from(event: DemuxEvent) -> Self {
        match event {
            DemuxEvent::Reasoning(text) => TurnEvent::ReasoningChunk(text),
            DemuxEvent::Answer(text) => TurnEvent::AnswerChunk(text),
        }
    }
}
