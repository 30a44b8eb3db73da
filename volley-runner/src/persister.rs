//! Result file persistence

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;
use url::Url;

use crate::error::PersistError;

/// Writes completed-run output into the results directory
#[derive(Debug, Clone)]
pub struct ResultPersister {
    results_dir: PathBuf,
}

impl ResultPersister {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Deterministic result path: `<hostname> <timestamp>.csv`.
    ///
    /// The timestamp is the moment the run was accepted, second precision,
    /// periods instead of colons. Collisions within one second are not
    /// prevented.
    pub fn result_path(&self, target: &Url, started_at: &DateTime<Local>) -> PathBuf {
        let host = target.host_str().unwrap_or_default();
        let stamp = started_at.format("%Y-%m-%d %H.%M.%S");
        self.results_dir.join(format!("{} {}.csv", host, stamp))
    }

    /// Write the accumulated buffer verbatim. No retry on failure; the
    /// caller logs the error and moves on.
    pub async fn persist(
        &self,
        target: &Url,
        started_at: &DateTime<Local>,
        output: &[u8],
    ) -> Result<PathBuf, PersistError> {
        let path = self.result_path(target, started_at);

        tokio::fs::write(&path, output)
            .await
            .map_err(|source| PersistError::Write {
                path: path.display().to_string(),
                source,
            })?;

        info!("Persisted {} bytes to {}", output.len(), path.display());
        Ok(path)
    }
}
