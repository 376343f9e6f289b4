//! Infrastructure layer for parley
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod openai;
pub mod storage;
pub mod tools;
pub mod transport;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentConfig, FileConfig, FileLoggingConfig,
    FileStorageConfig, FileSummarizationConfig,
};
pub use logging::JsonlConversationLogger;
pub use openai::{OpenAiAgent, OpenAiClient, OpenAiError, OpenAiSummaryModel};
pub use storage::{Database, SqliteMessageStore};
pub use tools::BuiltinTools;
pub use transport::SseEventSink;
