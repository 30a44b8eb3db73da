//! Main application configuration and router setup

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use volley_results::ResultStore;
use volley_runner::RunSupervisor;

use crate::{
    context::{FilesContext, RunsContext},
    handlers,
};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Enable CORS middleware
    pub enable_cors: bool,
    /// Directory holding the static console site
    pub site_dir: PathBuf,
    /// Upper bound for upload request bodies
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            site_dir: PathBuf::from("site"),
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Application context containing all dependencies
#[derive(Clone)]
pub struct AppContext {
    pub runs: RunsContext,
    pub files: FilesContext,
}

impl AppContext {
    pub fn new(supervisor: Arc<RunSupervisor>, store: ResultStore) -> Self {
        Self {
            runs: RunsContext::new(supervisor),
            files: FilesContext::new(store),
        }
    }
}

/// Create the complete console application
pub fn create_app(context: AppContext, config: AppConfig) -> Router {
    // Stored results are downloadable as-is under /data
    let results_dir = context.files.store.root().to_path_buf();

    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", create_api_router(config.max_upload_bytes))
        .with_state(context)
        .nest_service("/data", ServeDir::new(results_dir))
        .fallback_service(ServeDir::new(&config.site_dir));

    if config.enable_cors {
        app = app.layer(cors_layer());
    }

    app.layer(TraceLayer::new_for_http())
}

/// API routes behind the `/api` prefix
fn create_api_router(max_upload_bytes: usize) -> Router<AppContext> {
    Router::new()
        .route("/run", post(handlers::start_run).get(handlers::run_status))
        .route("/files", get(handlers::list_files))
        .route(
            "/upload",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

/// Permissive CORS for the single-operator console
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
