//! Error types for run supervision

use thiserror::Error;

/// Result type for supervisor operations
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Errors returned synchronously from `start`
///
/// Launch and output faults are not represented here: they are recorded
/// asynchronously as the run's terminal exit code and observed through
/// status polls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    /// A run is already in flight; concurrent starts are rejected, not queued
    #[error("load generator already running")]
    AlreadyRunning,

    /// The target URL does not parse or carries no host
    #[error("URL is invalid")]
    InvalidUrl,
}

/// Errors from writing a result file
#[derive(Error, Debug)]
pub enum PersistError {
    /// Write to the results directory failed
    #[error("Failed to write result file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
