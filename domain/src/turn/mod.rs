//! Conversational turn aggregate.

pub mod entities;
