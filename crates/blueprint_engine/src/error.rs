//! Engine error types.

use thiserror::Error;

/// Errors that can occur during generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Input was malformed or missing.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl EngineError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Result type for generator operations.
pub type EngineResult<T> = Result<T, EngineError>;
