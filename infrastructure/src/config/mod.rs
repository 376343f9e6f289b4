//! Configuration file loading for parley
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `PARLEY_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./parley.toml` or `./.parley.toml`
//! 4. Global: `$XDG_CONFIG_HOME/parley/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_BASE_URL, FileAgentConfig, FileConfig, FileLoggingConfig,
    FileStorageConfig, FileSummarizationConfig,
};
pub use loader::{ConfigFile, ConfigLoader, ENV_PREFIX};
