//! Presentation layer for parley
//!
//! This crate contains CLI definitions, event sinks for console and
//! JSON output, and the history and session list formatters.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat, SessionAction};
pub use output::console::ConsoleEventSink;
pub use output::history::HistoryFormatter;
pub use output::json::JsonLinesEventSink;
pub use output::sessions::SessionListFormatter;
