//! In-memory content store for testing.
//!
//! Provides [`MemoryContentStore`] for unit testing without filesystem access.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::frontmatter::split_frontmatter;
use crate::storage::{ContentStore, RawDocument, StorageError, StorageErrorKind};

/// In-memory content store.
///
/// Use the builder methods to configure the store with test data.
///
/// # Example
///
/// ```ignore
/// use folio_storage::{ContentStore, MemoryContentStore};
///
/// let store = MemoryContentStore::new()
///     .with_document("chapters/optics", "---\ntitle: Optics\n---\nBody");
///
/// let doc = store.get("chapters/optics").unwrap().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    documents: HashMap<String, RawDocument>,
    failing: HashSet<String>,
}

impl MemoryContentStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document from its full source (frontmatter + body).
    ///
    /// # Panics
    ///
    /// Panics if the frontmatter is not valid YAML.
    #[must_use]
    pub fn with_document(mut self, slug: impl Into<String>, source: &str) -> Self {
        let slug = slug.into();
        let (frontmatter, body) = split_frontmatter(source).unwrap();
        let document = RawDocument {
            source_path: PathBuf::from(format!("{slug}/index.mdx")),
            slug: slug.clone(),
            frontmatter: frontmatter.unwrap_or_default(),
            body: body.to_owned(),
        };
        self.documents.insert(slug, document);
        self
    }

    /// Make lookups of `slug` fail with a storage error.
    #[must_use]
    pub fn with_failure(mut self, slug: impl Into<String>) -> Self {
        self.failing.insert(slug.into());
        self
    }
}

impl ContentStore for MemoryContentStore {
    fn get(&self, slug: &str) -> Result<Option<RawDocument>, StorageError> {
        if self.failing.contains(slug) {
            return Err(StorageError::new(StorageErrorKind::Other)
                .with_backend("Memory")
                .with_path(slug));
        }
        Ok(self.documents.get(slug).cloned())
    }
}
