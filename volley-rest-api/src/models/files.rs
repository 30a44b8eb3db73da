//! Response bodies for result-file endpoints

use serde::{Deserialize, Serialize};

/// Listing of stored result files, as paths relative to the results root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
}
