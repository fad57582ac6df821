//! Slug resolution.
//!
//! Maps the slug segments of a request to a content document and renders
//! it. Missing content is `Ok(None)`; only storage failures are errors.

use std::sync::Arc;

use folio_routes::Page;
use folio_storage::{ContentStore, RawDocument, StorageError};
use serde::Serialize;

use crate::render::MarkdownRenderer;

/// Errors from resolving a page.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Content store failed (unreadable file, malformed frontmatter).
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Title and description of a page, without its body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    /// Slug the page was resolved from (segments joined by `/`).
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Description from frontmatter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fully rendered page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedPage {
    /// Slug the page was resolved from (segments joined by `/`).
    pub slug: String,
    /// Display title: frontmatter, else first H1, else the last slug
    /// segment title-cased.
    pub title: String,
    /// Description from frontmatter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rendered body.
    pub html: String,
}

/// Resolves slugs against a content store.
pub struct Resolver {
    store: Arc<dyn ContentStore>,
    renderer: MarkdownRenderer,
}

impl Resolver {
    /// Create a resolver over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Resolve and render the page at `segments`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Storage`] if the content exists but cannot be
    /// read or parsed.
    pub fn resolve(&self, segments: &[&str]) -> Result<Option<ResolvedPage>, SiteError> {
        let slug = segments.join("/");
        let Some(document) = self.store.get(&slug)? else {
            return Ok(None);
        };

        let rendered = self.renderer.render(&document.body);
        let RawDocument {
            frontmatter, slug, ..
        } = document;
        let title = frontmatter
            .title
            .or(rendered.title)
            .unwrap_or_else(|| fallback_title(segments));

        tracing::debug!(slug = %slug, title = %title, "Resolved page");

        Ok(Some(ResolvedPage {
            slug,
            title,
            description: frontmatter.description,
            html: rendered.html,
        }))
    }

    /// Title and description for the page at `segments`, without rendering
    /// its body.
    ///
    /// Without a frontmatter title the slug fallback is used; the body is
    /// not scanned for a heading.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Storage`] if the content exists but cannot be
    /// read or parsed.
    pub fn metadata(&self, segments: &[&str]) -> Result<Option<PageMetadata>, SiteError> {
        let slug = segments.join("/");
        let Some(document) = self.store.get(&slug)? else {
            return Ok(None);
        };

        let frontmatter = document.frontmatter;
        Ok(Some(PageMetadata {
            slug: document.slug,
            title: frontmatter
                .title
                .unwrap_or_else(|| fallback_title(segments)),
            description: frontmatter.description,
        }))
    }
}

/// Slug segments for every page, for static generation.
///
/// `"/chapters/optics"` gives `["chapters", "optics"]`.
#[must_use]
pub fn static_slugs(pages: &[Page]) -> Vec<Vec<String>> {
    pages
        .iter()
        .map(|page| {
            page.slug_segments()
                .into_iter()
                .map(str::to_owned)
                .collect()
        })
        .collect()
}

/// Title-cased last segment, or "Home" for the root.
fn fallback_title(segments: &[&str]) -> String {
    let Some(last) = segments.last() else {
        return "Home".to_owned();
    };
    let mut title = String::with_capacity(last.len());
    for word in last.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !title.is_empty() {
            title.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            title.extend(first.to_uppercase());
            title.push_str(chars.as_str());
        }
    }
    title
}
