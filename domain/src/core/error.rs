//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unparsable model output: {0}")]
    UnparsableOutput(String),

    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
