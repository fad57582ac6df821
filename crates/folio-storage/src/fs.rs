//! Filesystem content store.

use std::path::{Path, PathBuf};

use crate::frontmatter::split_frontmatter;
use crate::storage::{ContentStore, RawDocument, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Index file names tried for directory-style slugs, in order.
const INDEX_FILES: [&str; 2] = ["index.mdx", "index.md"];

/// Extensions tried for file-style slugs, in order.
const EXTENSIONS: [&str; 2] = ["mdx", "md"];

/// Filesystem content store rooted at a content directory.
///
/// A slug resolves to the first existing file of:
///
/// ```text
/// <root>/<slug>/index.mdx
/// <root>/<slug>/index.md
/// <root>/<slug>.mdx
/// <root>/<slug>.md
/// ```
///
/// The empty slug resolves to `<root>/index.mdx` or `<root>/index.md`.
/// Slugs that could escape the root (`..`, `.`, empty segments, backslashes)
/// resolve to nothing.
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    /// Create a store reading from `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Candidate files for a slug, in lookup order.
    fn candidates(&self, slug: &str) -> Vec<PathBuf> {
        let base = if slug.is_empty() {
            self.root.clone()
        } else {
            self.root.join(slug)
        };

        let mut paths: Vec<PathBuf> = INDEX_FILES.iter().map(|name| base.join(name)).collect();
        if !slug.is_empty() {
            // Append rather than `with_extension`: slugs may contain dots.
            paths.extend(EXTENSIONS.iter().map(|ext| {
                let mut file = base.clone().into_os_string();
                file.push(".");
                file.push(ext);
                PathBuf::from(file)
            }));
        }
        paths
    }

    fn read_document(&self, slug: &str, path: &Path) -> Result<RawDocument, StorageError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))?;

        let (frontmatter, body) = split_frontmatter(&source).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidData)
                .with_backend(BACKEND)
                .with_path(path)
                .with_source(e)
        })?;

        let source_path = path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();

        Ok(RawDocument {
            slug: slug.to_owned(),
            source_path,
            frontmatter: frontmatter.unwrap_or_default(),
            body: body.to_owned(),
        })
    }
}

/// Check that every slug segment is a plain name.
fn is_safe_slug(slug: &str) -> bool {
    if slug.is_empty() {
        return true;
    }
    !slug.contains('\\')
        && slug
            .split('/')
            .all(|segment| !matches!(segment, "" | "." | ".."))
}

impl ContentStore for FsContentStore {
    fn get(&self, slug: &str) -> Result<Option<RawDocument>, StorageError> {
        if !is_safe_slug(slug) {
            tracing::debug!(slug, "Rejected unsafe slug");
            return Ok(None);
        }

        let Some(path) = self.candidates(slug).into_iter().find(|p| p.is_file()) else {
            tracing::debug!(slug, "No content for slug");
            return Ok(None);
        };

        self.read_document(slug, &path).map(Some)
    }
}
