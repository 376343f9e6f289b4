//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`TurnParams`]: marker, lookahead, history size and agent timeout
//! - [`SummarizerParams`]: worker pool and queue sizing

pub mod summarizer_params;
pub mod turn_params;

pub use summarizer_params::SummarizerParams;
pub use turn_params::{DEFAULT_AGENT_TIMEOUT, TurnParams};
