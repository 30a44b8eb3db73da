//! Load-generator supervision for Volley
//!
//! This crate owns the lifecycle of the `hey` child process: building its
//! command line, launching it with piped output, screening the first stdout
//! chunk for error text, persisting good CSV output, and exposing the
//! `{running, code}` snapshot the HTTP layer reports. At most one run is
//! active at a time; concurrent starts are rejected, never queued.

pub mod classifier;
pub mod error;
pub mod launcher;
pub mod persister;
pub mod supervisor;

pub use classifier::OutputClassifier;
pub use error::{PersistError, RunnerError, RunnerResult};
pub use persister::ResultPersister;
pub use supervisor::{RunStatus, RunSupervisor, EXIT_CODE_BAD_OUTPUT, EXIT_CODE_PENDING};
