//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section uses `#[serde(default)]`, so any subset may be given.

mod agent;
mod logging;
mod storage;
mod summarization;

pub use agent::{DEFAULT_BASE_URL, FileAgentConfig};
pub use logging::FileLoggingConfig;
pub use storage::FileStorageConfig;
pub use summarization::FileSummarizationConfig;

use parley_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when validation finds at least one error-severity issue.
#[derive(Error, Debug)]
#[error("invalid configuration: {}", .issues.iter().map(|i| i.message.as_str()).collect::<Vec<_>>().join("; "))]
pub struct ConfigValidationError {
    pub issues: Vec<ConfigIssue>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent model, endpoint and turn settings
    pub agent: FileAgentConfig,
    /// Background summarizer settings
    pub summarization: FileSummarizationConfig,
    /// Message database settings
    pub storage: FileStorageConfig,
    /// Diagnostic and conversation log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.agent.validate();
        if self.summarization.enabled {
            issues.extend(self.summarization.validate());
        }
        issues
    }

    /// Like [`validate`](Self::validate), but fails on any error-severity issue.
    ///
    /// Returns the remaining warnings on success.
    pub fn validated(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let issues = self.validate();
        if ConfigIssue::has_errors(&issues) {
            return Err(ConfigValidationError { issues });
        }
        Ok(issues)
    }
}
