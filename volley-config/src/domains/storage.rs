//! Results storage configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory where result CSV files live; created at startup if
    /// missing, also served read-only at `/data`
    #[serde(default = "default_results_dir")]
    pub results_dir: String,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Validatable for StorageConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.results_dir, "results_dir", self.domain_name())?;
        validate_positive(self.max_upload_bytes, "max_upload_bytes", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "storage"
    }
}

// Default value functions
fn default_results_dir() -> String {
    "data".to_string()
}

fn default_max_upload_bytes() -> u64 {
    50 * 1024 * 1024 // 50 MiB
}
