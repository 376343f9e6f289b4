//! Message domain.
//!
//! - [`entities::Message`]: a persisted conversation message
//! - [`entities::NewMessage`]: a row about to be inserted
//! - [`memory::ConversationMemory`]: session history as the agent sees it

pub mod entities;
pub mod memory;
