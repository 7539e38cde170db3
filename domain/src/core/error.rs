//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("A chat turn needs a query or content items")]
    EmptyTurn,

    #[error("Invalid content item: {0}")]
    InvalidContentItem(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),
}

impl DomainError {
    /// Check if this error was caused by the caller's input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyTurn | DomainError::InvalidContentItem(_)
        )
    }
}
