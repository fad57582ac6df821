//! Manifest persistence.

use std::io::Write;
use std::path::{Path, PathBuf};

use folio_storage::{StorageError, StorageErrorKind};
use serde::{Deserialize, Serialize};

use crate::entry::{Page, RouteEntry};
use crate::flatten::flatten;

/// Persisted manifest document.
///
/// `pages` is derived from `routes` and written alongside it so that static
/// site tooling can read the flattened list without re-walking the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    /// Navigation tree.
    pub routes: Vec<RouteEntry>,
    /// Flattened navigable pages.
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl ManifestFile {
    /// Build a manifest document, deriving `pages` from `routes`.
    #[must_use]
    pub fn from_routes(routes: Vec<RouteEntry>) -> Self {
        let pages = flatten(&routes);
        Self { routes, pages }
    }
}

/// Storage seam for the manifest.
///
/// Implementations load and replace the whole document. Partial writes must
/// never be observable.
pub trait ManifestBackend: Send + Sync {
    /// Load the persisted manifest, or `None` if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the manifest exists but cannot be read or
    /// parsed.
    fn load(&self) -> Result<Option<ManifestFile>, StorageError>;

    /// Replace the persisted manifest.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the manifest cannot be written.
    fn save(&self, manifest: &ManifestFile) -> Result<(), StorageError>;
}

const BACKEND: &str = "Json";

/// Manifest stored as a pretty-printed JSON file.
///
/// Saves go through a temporary file in the same directory followed by a
/// rename, so readers see either the old or the new manifest.
pub struct JsonManifestBackend {
    path: PathBuf,
}

impl JsonManifestBackend {
    /// Create a backend for the manifest at `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Manifest file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, err: std::io::Error) -> StorageError {
        StorageError::io(err, Some(self.path.clone())).with_backend(BACKEND)
    }

    fn data_error(&self, err: serde_json::Error) -> StorageError {
        StorageError::new(StorageErrorKind::InvalidData)
            .with_backend(BACKEND)
            .with_path(&self.path)
            .with_source(err)
    }
}

impl ManifestBackend for JsonManifestBackend {
    fn load(&self) -> Result<Option<ManifestFile>, StorageError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No manifest yet");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let manifest = serde_json::from_str(&data).map_err(|e| self.data_error(e))?;
        Ok(Some(manifest))
    }

    fn save(&self, manifest: &ManifestFile) -> Result<(), StorageError> {
        let mut json = serde_json::to_string_pretty(manifest).map_err(|e| self.data_error(e))?;
        json.push('\n');

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| self.io_error(e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| self.io_error(e))?;
        tmp.flush().map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            routes = manifest.routes.len(),
            pages = manifest.pages.len(),
            "Saved manifest"
        );
        Ok(())
    }
}
