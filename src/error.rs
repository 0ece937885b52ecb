//! Error types for csvdb
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using CsvDbError
pub type Result<T> = std::result::Result<T, CsvDbError>;

/// Unified error type for csvdb operations
#[derive(Debug, Error)]
pub enum CsvDbError {
    // -------------------------------------------------------------------------
    // Row Errors
    // -------------------------------------------------------------------------
    #[error("Duplicate row: an identical row already exists")]
    DuplicateRow,

    #[error("Row not found")]
    RowNotFound,

    #[error("Row has no fields")]
    EmptyRow,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Codec error at line {line}: {message}")]
    Codec { line: usize, message: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CsvDbError {
    /// Build a codec error for the given 1-based line
    pub fn codec(line: usize, message: impl Into<String>) -> Self {
        CsvDbError::Codec {
            line,
            message: message.into(),
        }
    }

    /// True for errors caused by the requested row operation itself
    /// (duplicate / missing / field-less row), false for I/O, codec and
    /// config failures.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            CsvDbError::DuplicateRow | CsvDbError::RowNotFound | CsvDbError::EmptyRow
        )
    }
}
