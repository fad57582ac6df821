//! Content store trait and error types.
//!
//! # Slug Convention
//!
//! All lookups take **slugs**, not file paths:
//! - `""` - root page
//! - `"chapters"` - a section landing page
//! - `"chapters/heat_transfer"` - a chapter
//!
//! Slugs never carry a leading or trailing slash. Stores map slugs to their
//! internal layout.

use std::path::PathBuf;

use crate::frontmatter::Frontmatter;

/// A content document as stored: parsed frontmatter plus unrendered body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    /// Slug the document was resolved from.
    pub slug: String,
    /// File the document was read from.
    pub source_path: PathBuf,
    /// Frontmatter header. Defaults when the file has none.
    pub frontmatter: Frontmatter,
    /// Markdown/MDX body following the frontmatter.
    pub body: String,
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or identifier.
    InvalidPath,
    /// Stored data could not be decoded.
    InvalidData,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Json", "Memory").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => StorageErrorKind::InvalidData,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::InvalidData => "Invalid data",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Slug-addressed content lookup.
///
/// Absence is not an error: `Ok(None)` means "no such content", and callers
/// report it as not-found. `Err` is reserved for stores that could not answer
/// (unreadable file, malformed frontmatter, backend down).
pub trait ContentStore: Send + Sync {
    /// Look up the document for a slug.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document exists but cannot be read or parsed.
    fn get(&self, slug: &str) -> Result<Option<RawDocument>, StorageError>;

    /// Check if a document exists for the slug.
    ///
    /// Returns `false` on errors.
    fn exists(&self, slug: &str) -> bool {
        matches!(self.get(slug), Ok(Some(_)))
    }
}
