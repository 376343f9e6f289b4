//! Domain layer for parley
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Turn
//!
//! A turn is one user query and the agent's streamed reply. The reply is a
//! single text stream in which reasoning comes first and the final answer is
//! introduced by a marker (`"AI:"`). The [`StreamDemultiplexer`] splits that
//! stream live, whatever the chunk boundaries.
//!
//! ## Sessions and Tools
//!
//! Turns belong to a [`Session`], which carries a title. While answering,
//! the agent may call tools ([`ToolDefinition`], [`ToolCall`]); their output
//! is kept with the answer as [`ToolCallResult`]s.
//!
//! ## Memory and Summaries
//!
//! Each query is sent with the session's recent messages. Long messages are
//! summarized in the background ([`SummaryTask`], [`SummaryPolicy`]) and the
//! summary replaces the full content in later memory.

pub mod config;
pub mod core;
pub mod message;
pub mod prompt;
pub mod session;
pub mod stream;
pub mod summary;
pub mod tool;
pub mod turn;
pub mod util;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::error::DomainError;
pub use message::{
    entities::{Message, MessageId, NewMessage, Role, SessionId, ToolCallResult},
    memory::{ConversationMemory, DEFAULT_HISTORY_LIMIT, MemoryEntry},
};
pub use prompt::{AgentPromptTemplate, SummaryPromptTemplate};
pub use session::{DEFAULT_SESSION_TITLE, Session, SessionTitle};
pub use stream::{
    demux::{
        DEFAULT_ANSWER_MARKER, DEFAULT_LOOKAHEAD_CHARS, DemuxEvent, DemuxState,
        StreamDemultiplexer,
    },
    event::TurnEvent,
};
pub use summary::{
    policy::{DEFAULT_MIN_CONTENT_BYTES, SkipReason, SummaryPolicy},
    task::{SummaryTask, SummaryUpdate},
};
pub use tool::{ToolCall, ToolDefinition, ToolError, ToolParameter};
pub use turn::entities::{Turn, TurnOutcome, TurnTranscript};
