//! Context types for dependency injection in REST API handlers
//!
//! Context structs group the collaborators each endpoint group needs, so
//! handlers declare their dependencies instead of reaching into globals.

use std::sync::Arc;

use volley_results::ResultStore;
use volley_runner::RunSupervisor;

/// Context for run-control endpoints
#[derive(Clone)]
pub struct RunsContext {
    /// Supervisor owning the single run slot
    pub supervisor: Arc<RunSupervisor>,
}

impl RunsContext {
    pub fn new(supervisor: Arc<RunSupervisor>) -> Self {
        Self { supervisor }
    }
}

/// Context for result-file endpoints
#[derive(Clone)]
pub struct FilesContext {
    /// Store rooted at the results directory
    pub store: ResultStore,
}

impl FilesContext {
    pub fn new(store: ResultStore) -> Self {
        Self { store }
    }
}
