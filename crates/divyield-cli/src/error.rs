//! CLI error types.

use std::path::PathBuf;

use divyield_core::Date;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing required argument.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// Reversed date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start.
        start: Date,
        /// Requested end.
        end: Date,
    },

    /// Input table without rows to derive a date range from.
    #[error("No observation rows in {}", .0.display())]
    EmptyInput(PathBuf),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
