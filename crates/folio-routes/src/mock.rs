//! In-memory manifest backend for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use folio_storage::{StorageError, StorageErrorKind};

use crate::backend::{ManifestBackend, ManifestFile};

/// Manifest backend keeping the saved document in memory.
///
/// Counts saves so tests can assert that no-op mutations did not persist.
#[derive(Debug, Default)]
pub struct MemoryManifestBackend {
    manifest: Mutex<Option<ManifestFile>>,
    saves: AtomicUsize,
    fail_saves: bool,
}

impl MemoryManifestBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with an existing manifest.
    #[must_use]
    pub fn with_manifest(self, manifest: ManifestFile) -> Self {
        Self {
            manifest: Mutex::new(Some(manifest)),
            ..self
        }
    }

    /// Make every save fail.
    #[must_use]
    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    /// Last saved (or seeded) manifest.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn saved(&self) -> Option<ManifestFile> {
        self.manifest.lock().unwrap().clone()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ManifestBackend for MemoryManifestBackend {
    fn load(&self) -> Result<Option<ManifestFile>, StorageError> {
        Ok(self.saved())
    }

    fn save(&self, manifest: &ManifestFile) -> Result<(), StorageError> {
        if self.fail_saves {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied).with_backend("Memory"));
        }
        *self.manifest.lock().unwrap() = Some(manifest.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
