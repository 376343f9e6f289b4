//! OpenAI-compatible chat completion adapters
//!
//! Both the conversational agent and the summary model talk to the same
//! `/chat/completions` API, so they share one [`OpenAiClient`].

mod agent;
mod client;
pub mod error;
mod summarizer;

pub use agent::{DEFAULT_MAX_TOOL_ROUNDS, OpenAiAgent};
pub use client::{ChatMessage, OpenAiClient, StreamedReply, WireFunction, WireToolCall};
pub use error::OpenAiError;
pub use summarizer::{DEFAULT_SUMMARY_TIMEOUT, OpenAiSummaryModel};
