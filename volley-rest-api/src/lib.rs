//! # Volley REST API
//!
//! HTTP layer for the Volley load-test console. Exposes run control,
//! status polling, result-file listing and upload intake, plus static
//! serving of the console site and the results directory.
//!
//! ## Architecture
//!
//! Handlers receive their collaborators through context structs rather
//! than globals, so the whole router can be assembled against temporary
//! directories and fixture binaries in tests.

pub mod app;
pub mod context;
pub mod errors;
pub mod handlers;
pub mod models;

// Re-export commonly used types
pub use app::{create_app, AppConfig, AppContext};
pub use context::{FilesContext, RunsContext};
pub use errors::{RestError, RestResult};
pub use models::*;
