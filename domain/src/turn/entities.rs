//! Turn aggregate.

use crate::core::error::DomainError;
use crate::message::entities::{SessionId, ToolCallResult};
use crate::stream::demux::{DemuxEvent, StreamDemultiplexer};
use crate::stream::event::TurnEvent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a turn's agent call ended, for the paths that persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The agent finished normally.
    Completed,
    /// The agent's output could not be parsed; the streamed answer is kept.
    ParseFailure,
    /// The caller went away; whatever was streamed so far is kept.
    Cancelled,
}

impl TurnOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnOutcome::Completed => "completed",
            TurnOutcome::ParseFailure => "parse_failure",
            TurnOutcome::Cancelled => "cancelled",
        }
    }

    /// Whether the answer may be incomplete.
    pub fn is_partial(&self) -> bool {
        !matches!(self, TurnOutcome::Completed)
    }
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One in-flight conversational turn (Aggregate).
///
/// Owns the demultiplexer for the agent's output and collects tool results.
/// A turn lives for exactly one request and is consumed by [`Turn::conclude`].
///
/// The answer never starts with whitespace: blank text between the marker
/// and the first answer character is not forwarded, and adopted answers are
/// trimmed the same way. What is persisted is exactly what was forwarded.
#[derive(Debug)]
pub struct Turn {
    session_id: SessionId,
    query: String,
    demux: StreamDemultiplexer,
    answer: String,
    tool_results: Vec<ToolCallResult>,
    canceled: bool,
    finished: bool,
}

impl Turn {
    pub fn new(
        session_id: SessionId,
        query: impl Into<String>,
        demux: StreamDemultiplexer,
    ) -> Result<Self, DomainError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(DomainError::InvalidQuery("query is empty".to_string()));
        }
        Ok(Self {
            session_id,
            query,
            demux,
            answer: String::new(),
            tool_results: Vec::new(),
            canceled: false,
            finished: false,
        })
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Feed one raw chunk; returns the events to forward.
    ///
    /// Chunks arriving after cancellation or finish are ignored.
    pub fn push_chunk(&mut self, chunk: &str) -> Vec<TurnEvent> {
        if self.canceled || self.finished {
            return Vec::new();
        }
        let events = self.demux.push(chunk);
        events
            .into_iter()
            .filter_map(|event| match event {
                DemuxEvent::Answer(text) => self.forward_answer(&text),
                reasoning => Some(TurnEvent::from(reasoning)),
            })
            .collect()
    }

    fn forward_answer(&mut self, text: &str) -> Option<TurnEvent> {
        let text = if self.answer.is_empty() {
            text.trim_start()
        } else {
            text
        };
        if text.is_empty() {
            return None;
        }
        self.answer.push_str(text);
        Some(TurnEvent::AnswerChunk(text.to_string()))
    }

    /// Record a tool invocation; returns the event to forward, if any.
    pub fn record_tool_result(&mut self, result: ToolCallResult) -> Option<TurnEvent> {
        if self.canceled || self.finished {
            return None;
        }
        self.tool_results.push(result.clone());
        Some(TurnEvent::ToolCallResult(result))
    }

    /// End of agent output: release held-back text as a reasoning event.
    pub fn finish(&mut self) -> Option<TurnEvent> {
        if self.finished {
            return None;
        }
        self.finished = true;
        self.demux.finish().map(TurnEvent::from)
    }

    /// Stop forwarding. Held-back text still goes into the reasoning trace.
    pub fn cancel(&mut self) {
        if self.finished {
            return;
        }
        self.canceled = true;
        self.finished = true;
        // accumulated, not forwarded
        let _ = self.demux.finish();
    }

    /// Adopt the agent's returned text as the answer when no marker was streamed.
    ///
    /// Returns the event carrying the adopted text so the caller sees what is
    /// persisted.
    pub fn adopt_answer(&mut self, text: &str) -> Option<TurnEvent> {
        if !self.answer.is_empty() || self.canceled {
            return None;
        }
        self.forward_answer(text)
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    pub fn reasoning(&self) -> &str {
        self.demux.reasoning()
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn tool_results(&self) -> &[ToolCallResult] {
        &self.tool_results
    }

    /// Consume the turn into what gets persisted.
    pub fn conclude(mut self, outcome: TurnOutcome) -> TurnTranscript {
        if !self.finished {
            self.finish();
        }
        let reasoning_trace = self.demux.reasoning().to_string();
        TurnTranscript {
            session_id: self.session_id,
            query: self.query,
            answer: self.answer,
            reasoning_trace,
            tool_call_results: self.tool_results,
            outcome,
        }
    }
}

/// The durable result of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTranscript {
    pub session_id: SessionId,
    pub query: String,
    pub answer: String,
    pub reasoning_trace: String,
    pub tool_call_results: Vec<ToolCallResult>,
    pub outcome: TurnOutcome,
}

impl TurnTranscript {
    /// An assistant row is written only when there is answer text.
    pub fn has_answer(&self) -> bool {
        !self.answer.is_empty()
    }
}
