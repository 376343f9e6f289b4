//! Tool domain.
//!
//! Tools are functions the agent may call while it works on a turn. Each
//! invocation's output is reported as a [`ToolCallResult`], forwarded live
//! and stored on the assistant row.
//!
//! [`ToolCallResult`]: crate::message::entities::ToolCallResult

pub mod entities;

pub use entities::{ToolCall, ToolDefinition, ToolError, ToolParameter};
