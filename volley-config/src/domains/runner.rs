//! Load-generator runner configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Path to the load-generator executable, resolved relative to the
    /// working directory when not absolute
    #[serde(default = "default_binary")]
    pub binary: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
        }
    }
}

impl Validatable for RunnerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.binary, "binary", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "runner"
    }
}

fn default_binary() -> String {
    "bin/hey".to_string()
}
