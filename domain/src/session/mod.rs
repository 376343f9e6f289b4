//! Session domain.
//!
//! A session is a persistent conversation: an id, a human-readable title and
//! the ordered messages stored under that id.

pub mod entities;

pub use entities::{DEFAULT_SESSION_TITLE, MAX_TITLE_CHARS, Session, SessionTitle};
