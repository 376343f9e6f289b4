//! Configuration value objects for the domain layer
//!
//! Validation results shared by the configuration loader and the CLI.

pub mod validation;

pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
