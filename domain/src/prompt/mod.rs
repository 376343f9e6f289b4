//! Prompt domain
//!
//! Templates for the agent system prompt and the summarization prompt.

pub mod agent;
pub mod summary;

pub use agent::AgentPromptTemplate;
pub use summary::SummaryPromptTemplate;
