//! In-memory manifest with persisted mutations.

use std::cmp::Ordering;

use folio_storage::StorageError;

use crate::backend::{ManifestBackend, ManifestFile};
use crate::entry::{Page, RouteEntry};
use crate::flatten::{flatten, normalize_href};

/// Title that always sorts first among a group's children.
pub const INTRODUCTION_TITLE: &str = "Introduction";

/// Errors from manifest mutations.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Target group is not a top-level entry of the manifest.
    #[error("Route group not found: {0}")]
    GroupNotFound(String),
    /// Entry title is empty or whitespace.
    #[error("Route title cannot be empty (href {0})")]
    EmptyTitle(String),
    /// Entry href has no path segment.
    #[error("Invalid route href: {0:?}")]
    InvalidHref(String),
    /// Loading or saving the manifest failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Ordering for a group's children.
///
/// [`INTRODUCTION_TITLE`] comes first; everything else by case-insensitive
/// title, ties broken by the raw bytes so the order is total.
#[must_use]
pub fn chapter_order(a: &RouteEntry, b: &RouteEntry) -> Ordering {
    let a_intro = a.title == INTRODUCTION_TITLE;
    let b_intro = b.title == INTRODUCTION_TITLE;
    b_intro
        .cmp(&a_intro)
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        .then_with(|| a.title.cmp(&b.title))
}

/// Route manifest owned in memory and written through a [`ManifestBackend`].
///
/// Every successful mutation persists the whole manifest. Mutations that
/// change nothing do not write. Concurrent writers are not coordinated.
pub struct ManifestStore {
    routes: Vec<RouteEntry>,
    backend: Box<dyn ManifestBackend>,
}

impl ManifestStore {
    /// Load the manifest from `backend`, starting empty if none is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Storage`] if the stored manifest cannot be
    /// read.
    pub fn open(backend: Box<dyn ManifestBackend>) -> Result<Self, ManifestError> {
        let routes = backend
            .load()?
            .map(|manifest| manifest.routes)
            .unwrap_or_default();
        tracing::debug!(routes = routes.len(), "Opened route manifest");
        Ok(Self { routes, backend })
    }

    /// Start from an initial tree. Nothing is written until a mutation.
    #[must_use]
    pub fn with_routes(backend: Box<dyn ManifestBackend>, routes: Vec<RouteEntry>) -> Self {
        Self { routes, backend }
    }

    /// Top-level entries.
    #[must_use]
    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    /// Flattened navigable pages.
    #[must_use]
    pub fn pages(&self) -> Vec<Page> {
        flatten(&self.routes)
    }

    /// Top-level entry with the given title.
    #[must_use]
    pub fn find_group(&self, title: &str) -> Option<&RouteEntry> {
        self.routes.iter().find(|entry| entry.title == title)
    }

    fn group_index(&self, title: &str) -> Option<usize> {
        self.routes.iter().position(|entry| entry.title == title)
    }

    /// Return the top-level group `title`, appending and persisting it first
    /// if it does not exist.
    ///
    /// An existing group is returned unchanged even if its href differs.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Storage`] if persisting a new group fails. The
    /// in-memory manifest is left as it was.
    pub fn ensure_group(
        &mut self,
        title: &str,
        href: &str,
        no_link: bool,
    ) -> Result<&RouteEntry, ManifestError> {
        let index = match self.group_index(title) {
            Some(index) => index,
            None => {
                let mut group = RouteEntry::group(title, href);
                group.no_link = no_link;
                self.routes.push(group);
                if let Err(e) = self.persist() {
                    self.routes.pop();
                    return Err(e);
                }
                tracing::info!(title, href, "Created route group");
                self.routes.len() - 1
            }
        };
        Ok(&self.routes[index])
    }

    /// Add a child link under the top-level group `group_title`.
    ///
    /// `href` is stored in its [`normalize_href`] form, so `/optics/` and
    /// `optics` name the same child as `/optics`. Returns `false` without
    /// writing when the group already has that child. Otherwise appends,
    /// re-sorts the group's children with [`chapter_order`], persists, and
    /// returns `true`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::EmptyTitle`] for a blank title,
    /// [`ManifestError::InvalidHref`] for an href with no path segment,
    /// [`ManifestError::GroupNotFound`] if the group does not exist, or
    /// [`ManifestError::Storage`] if persisting fails (the in-memory
    /// manifest is left as it was).
    pub fn add_child(
        &mut self,
        group_title: &str,
        title: &str,
        href: &str,
    ) -> Result<bool, ManifestError> {
        if title.trim().is_empty() {
            return Err(ManifestError::EmptyTitle(href.to_owned()));
        }
        let normalized =
            normalize_href(href).ok_or_else(|| ManifestError::InvalidHref(href.to_owned()))?;
        let href = normalized.as_str();

        let index = self
            .group_index(group_title)
            .ok_or_else(|| ManifestError::GroupNotFound(group_title.to_owned()))?;

        if self.routes[index].child_by_href(href).is_some() {
            tracing::debug!(group = group_title, href, "Route already present");
            return Ok(false);
        }

        let previous = self.routes[index].items.clone();
        let items = self.routes[index].items.get_or_insert_with(Vec::new);
        items.push(RouteEntry::link(title, href));
        items.sort_by(chapter_order);

        if let Err(e) = self.persist() {
            self.routes[index].items = previous;
            return Err(e);
        }

        tracing::info!(group = group_title, title, href, "Added route");
        Ok(true)
    }

    fn persist(&self) -> Result<(), ManifestError> {
        let manifest = ManifestFile::from_routes(self.routes.clone());
        self.backend.save(&manifest)?;
        Ok(())
    }
}
