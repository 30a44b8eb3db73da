//! Request and response bodies for run control

use serde::{Deserialize, Serialize};

/// Body of a run request
#[derive(Debug, Clone, Deserialize)]
pub struct StartRunRequest {
    /// Raw option string handed to the generator, split on whitespace
    #[serde(default)]
    pub params: String,
    /// Target the generator is pointed at; must carry a host
    pub url: String,
}

/// Acknowledgement for an accepted run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRunResponse {
    pub message: String,
}

impl StartRunResponse {
    pub fn started() -> Self {
        Self {
            message: "started".to_string(),
        }
    }
}
