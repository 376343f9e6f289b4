//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent;
pub mod conversation_logger;
pub mod event_sink;
pub mod message_store;
pub mod session_store;
pub mod summary_dispatch;
pub mod summary_model;
pub mod tool_executor;
