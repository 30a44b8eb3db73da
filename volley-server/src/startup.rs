//! Server startup and shutdown logic

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use volley_config::VolleyConfig;
use volley_rest_api::{create_app, AppConfig, AppContext};
use volley_results::ResultStore;
use volley_runner::{ResultPersister, RunSupervisor};

/// Server application struct
pub struct Server {
    config: VolleyConfig,
    context: AppContext,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: VolleyConfig) -> Result<Self> {
        crate::logging::init_logging(&config.logging)?;

        let store = ResultStore::new(&config.storage.results_dir);
        let persister = ResultPersister::new(&config.storage.results_dir);
        let supervisor = Arc::new(RunSupervisor::new(&config.runner.binary, persister));
        let context = AppContext::new(supervisor, store);

        Ok(Self { config, context })
    }

    /// Build the complete application router
    pub fn build_app(&self) -> Router {
        let app_config = AppConfig {
            enable_cors: self.config.server.enable_cors,
            site_dir: PathBuf::from(&self.config.server.site_dir),
            max_upload_bytes: self.config.storage.max_upload_bytes as usize,
        };

        create_app(self.context.clone(), app_config)
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        info!("Starting Volley v{}", env!("CARGO_PKG_VERSION"));
        self.log_config_summary();

        self.context
            .files
            .store
            .ensure_root()
            .await
            .context("failed to create results directory")?;

        let app = self.build_app();
        let addr = self.config.server.socket_addr();

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server shutdown complete");
        Ok(())
    }

    /// Log configuration summary
    fn log_config_summary(&self) {
        info!("Bind address: {}", self.config.server.socket_addr());
        info!("Generator binary: {}", self.config.runner.binary);
        info!("Results directory: {}", self.config.storage.results_dir);
        info!("Site directory: {}", self.config.server.site_dir);
        info!(
            "CORS: {}",
            if self.config.server.enable_cors {
                "enabled"
            } else {
                "disabled"
            }
        );
    }
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
