//! Background summarization: tasks and the selection policy.

pub mod policy;
pub mod task;
