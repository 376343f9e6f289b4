//! Reasoning/answer stream demultiplexer.
//!
//! An agent writes its intermediate reasoning first and then introduces the
//! final answer with a literal marker (`"AI:"` by default). Chunks arrive with
//! no alignment to that marker, so the marker may be split across any number
//! of chunks.
//!
//! [`StreamDemultiplexer`] is a two-state machine:
//!
//! | State       | On chunk                                                    |
//! |-------------|-------------------------------------------------------------|
//! | `Searching` | append to the lookahead buffer, look for the marker         |
//! | `Answering` | emit the chunk as [`DemuxEvent::Answer`] immediately         |
//!
//! While searching, everything except the last `lookahead` characters is
//! released as [`DemuxEvent::Reasoning`], so a marker straddling a chunk
//! boundary is always still in the buffer when its last character arrives.
//! The buffer is trimmed by characters, never bytes, so multi-byte text is
//! never split.
//!
//! # Example
//!
//! ```
//! use parley_domain::stream::demux::{DemuxEvent, StreamDemultiplexer};
//!
//! let mut demux = StreamDemultiplexer::default();
//! let mut events = Vec::new();
//! for chunk in ["thinking..", ".A", "I: 42"] {
//!     events.extend(demux.push(chunk));
//! }
//! events.extend(demux.finish());
//!
//! assert_eq!(demux.reasoning(), "thinking...");
//! assert_eq!(demux.answer(), " 42");
//! assert_eq!(events.last(), Some(&DemuxEvent::Answer(" 42".to_string())));
//! ```

use crate::core::error::DomainError;
use crate::util::char_offset;

/// Marker that separates reasoning from the final answer.
pub const DEFAULT_ANSWER_MARKER: &str = "AI:";

/// Characters held back while searching for the marker.
///
/// Only `marker_len - 1` are strictly required; the extra room is margin.
pub const DEFAULT_LOOKAHEAD_CHARS: usize = 10;

/// One demultiplexed piece of the agent's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemuxEvent {
    /// Text produced before the answer marker.
    Reasoning(String),
    /// Text produced after the answer marker.
    Answer(String),
}

impl DemuxEvent {
    pub fn text(&self) -> &str {
        match self {
            DemuxEvent::Reasoning(s) | DemuxEvent::Answer(s) => s,
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, DemuxEvent::Answer(_))
    }
}

/// Demultiplexer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemuxState {
    /// The marker has not been seen yet.
    #[default]
    Searching,
    /// The marker was seen; all further text is answer.
    Answering,
}

/// Splits a raw agent token stream into reasoning and answer.
///
/// Owned by exactly one turn; no internal synchronization.
#[derive(Debug, Clone)]
pub struct StreamDemultiplexer {
    marker: String,
    lookahead: usize,
    state: DemuxState,
    pending: String,
    reasoning: String,
    answer: String,
}

impl Default for StreamDemultiplexer {
    fn default() -> Self {
        Self {
            marker: DEFAULT_ANSWER_MARKER.to_string(),
            lookahead: DEFAULT_LOOKAHEAD_CHARS,
            state: DemuxState::Searching,
            pending: String::new(),
            reasoning: String::new(),
            answer: String::new(),
        }
    }
}

impl StreamDemultiplexer {
    /// Create a demultiplexer for `marker`, holding back `lookahead` characters.
    ///
    /// A lookahead shorter than `marker.chars().count() - 1` could let a split
    /// marker escape as reasoning, so it is raised to that minimum.
    pub fn new(marker: impl Into<String>, lookahead: usize) -> Result<Self, DomainError> {
        let marker = marker.into();
        if marker.is_empty() {
            return Err(DomainError::InvalidMarker);
        }
        let lookahead = lookahead.max(Self::min_lookahead(&marker));
        Ok(Self {
            marker,
            lookahead,
            ..Self::default()
        })
    }

    /// Smallest lookahead that can still detect `marker` across chunks.
    pub fn min_lookahead(marker: &str) -> usize {
        marker.chars().count().saturating_sub(1)
    }

    /// Feed one chunk and return the events it completes, in order.
    pub fn push(&mut self, chunk: &str) -> Vec<DemuxEvent> {
        if chunk.is_empty() {
            return Vec::new();
        }

        match self.state {
            DemuxState::Answering => {
                self.answer.push_str(chunk);
                vec![DemuxEvent::Answer(chunk.to_string())]
            }
            DemuxState::Searching => {
                self.pending.push_str(chunk);
                match self.pending.find(&self.marker) {
                    Some(idx) => self.split_at_marker(idx),
                    None => self.release_overflow().into_iter().collect(),
                }
            }
        }
    }

    /// Signal end of stream: any held-back text is released as reasoning.
    pub fn finish(&mut self) -> Option<DemuxEvent> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        self.reasoning.push_str(&rest);
        Some(DemuxEvent::Reasoning(rest))
    }

    pub fn state(&self) -> DemuxState {
        self.state
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// All reasoning released so far.
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// All answer text released so far.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Characters currently held back.
    pub fn pending_chars(&self) -> usize {
        self.pending.chars().count()
    }

    fn split_at_marker(&mut self, idx: usize) -> Vec<DemuxEvent> {
        let after = self.pending.split_off(idx + self.marker.len());
        self.pending.truncate(idx);
        let before = std::mem::take(&mut self.pending);
        self.state = DemuxState::Answering;

        let mut events = Vec::with_capacity(2);
        if !before.is_empty() {
            self.reasoning.push_str(&before);
            events.push(DemuxEvent::Reasoning(before));
        }
        if !after.is_empty() {
            self.answer.push_str(&after);
            events.push(DemuxEvent::Answer(after));
        }
        events
    }

    fn release_overflow(&mut self) -> Option<DemuxEvent> {
        let held = self.pending.chars().count();
        if held <= self.lookahead {
            return None;
        }
        let split = char_offset(&self.pending, held - self.lookahead);
        let kept = self.pending.split_off(split);
        let released = std::mem::replace(&mut self.pending, kept);
        self.reasoning.push_str(&released);
        Some(DemuxEvent::Reasoning(released))
    }
}
