//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// directory = "~/.local/state/parley/logs"   # daily rolling diagnostic log
/// conversation_log = "turns.jsonl"           # JSONL turn transcript
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for the rolling diagnostic log file (stderr only when unset)
    pub directory: Option<PathBuf>,
    /// Path of the JSONL conversation log (disabled when unset)
    pub conversation_log: Option<PathBuf>,
}
