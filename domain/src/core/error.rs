//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Answer marker cannot be empty")]
    InvalidMarker,

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("Invalid session title: {0}")]
    InvalidTitle(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::InvalidMarker.to_string(),
            "Answer marker cannot be empty"
        );
        assert_eq!(
            DomainError::InvalidRole("bot".to_string()).to_string(),
            "Invalid role: bot"
        );
    }
}
