//! Error types for trait operations.

use divyield_core::CoreError;
use thiserror::Error;

/// Result alias for source and store operations.
pub type TraitResult<T> = Result<T, TraitError>;

/// Common error type for trait operations.
#[derive(Debug, Error)]
pub enum TraitError {
    /// Requested dataset or file not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Source not available
    #[error("source not available: {0}")]
    SourceNotAvailable(String),

    /// Parse/deserialization error
    #[error("parse error: {0}")]
    ParseError(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Date logic error raised while preparing or filtering rows
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<std::io::Error> for TraitError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => TraitError::NotFound(e.to_string()),
            _ => TraitError::IoError(e.to_string()),
        }
    }
}
