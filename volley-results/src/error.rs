//! Error types for the results store

use thiserror::Error;

/// Errors raised by results-directory operations
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    #[error("Filesystem operation failed at {path} ({operation}): {error}")]
    Filesystem {
        path: String,
        operation: String,
        error: String,
    },

    #[error("Archive extraction failed: {error}")]
    Archive { error: String },

    #[error("Task join error: {error}")]
    TaskJoin { error: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
