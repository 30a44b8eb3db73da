//! Filesystem-backed store for benchmark result files

use std::io::Cursor;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{StoreError, StoreResult};

/// Store rooted at the results directory.
///
/// Every path the store hands out is relative to that root, so callers can
/// turn listings into download URLs directly. Writes never leave the root:
/// uploads keep only their base name and archive entries that resolve
/// outside the root are dropped.
#[derive(Debug, Clone)]
pub struct ResultStore {
    root: PathBuf,
}

impl ResultStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it does not exist yet
    pub async fn ensure_root(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| fs_error(&self.root, "create_dirs", e))
    }

    /// Recursively list result files as root-relative paths.
    ///
    /// The `.csv` extension match ignores case; everything else is skipped.
    /// Directory walking happens on the blocking pool.
    pub async fn list(&self) -> StoreResult<Vec<String>> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || list_csv_files(&root))
            .await
            .map_err(|e| StoreError::TaskJoin { error: e.to_string() })?
    }

    /// Write one uploaded file under the root, keeping only its base name
    pub async fn save(&self, file_name: &str, contents: &[u8]) -> StoreResult<PathBuf> {
        let base = Path::new(file_name)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("upload.csv"));
        let dest = self.root.join(base);

        fs::write(&dest, contents)
            .await
            .map_err(|e| fs_error(&dest, "write", e))?;
        info!("Stored uploaded results at {}", dest.display());
        Ok(dest)
    }

    /// Unpack an uploaded ZIP archive into the root, returning the number
    /// of files written
    pub async fn extract_archive(&self, archive: Vec<u8>) -> StoreResult<usize> {
        let root = self.root.clone();
        let written = tokio::task::spawn_blocking(move || extract_into(&root, archive))
            .await
            .map_err(|e| StoreError::TaskJoin { error: e.to_string() })??;
        info!("Extracted {} file(s) from uploaded archive", written);
        Ok(written)
    }
}

fn list_csv_files(root: &Path) -> StoreResult<Vec<String>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| StoreError::Filesystem {
            path: root.to_string_lossy().to_string(),
            operation: "list".to_string(),
            error: e.to_string(),
        })?;
        if !entry.file_type().is_file() || !has_csv_extension(entry.path()) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_string_lossy().to_string());
        }
    }
    Ok(files)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn extract_into(root: &Path, archive: Vec<u8>) -> StoreResult<usize> {
    let mut zip = ZipArchive::new(Cursor::new(archive))
        .map_err(|e| StoreError::Archive { error: e.to_string() })?;

    let mut written = 0;
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| StoreError::Archive { error: e.to_string() })?;

        // enclosed_name rejects absolute paths and parent traversal
        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping archive entry with unsafe path: {}", entry.name());
            continue;
        };
        let dest = root.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&dest).map_err(|e| fs_error(&dest, "create_dirs", e))?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| fs_error(parent, "create_dirs", e))?;
        }
        let mut out = std::fs::File::create(&dest).map_err(|e| fs_error(&dest, "create", e))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| fs_error(&dest, "write", e))?;
        written += 1;
    }

    Ok(written)
}

fn fs_error(path: &Path, operation: &str, error: std::io::Error) -> StoreError {
    StoreError::Filesystem {
        path: path.to_string_lossy().to_string(),
        operation: operation.to_string(),
        error: error.to_string(),
    }
}
