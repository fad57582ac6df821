//! Route manifest for Folio.
//!
//! The manifest is the navigation tree of the documentation site: an ordered
//! list of [`RouteEntry`] nodes, some of which are pure grouping nodes
//! (`noLink`). This crate provides:
//!
//! - [`RouteEntry`] and the flattened [`Page`] list derived from it
//! - [`flatten`]: depth-first reduction of the tree to navigable pages
//! - [`ManifestBackend`]: persistence seam, with [`JsonManifestBackend`]
//!   writing the whole manifest atomically
//! - [`ManifestStore`]: the in-memory tree plus the mutations the chapter
//!   importer needs, persisting after every change
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use folio_routes::{JsonManifestBackend, ManifestStore};
//!
//! let backend = JsonManifestBackend::new("routes.json".into());
//! let mut store = ManifestStore::open(Box::new(backend))?;
//!
//! store.ensure_group("Chapters", "/chapters", true)?;
//! let inserted = store.add_child("Chapters", "Optics", "/optics")?;
//!
//! for page in store.pages() {
//!     println!("{} -> {}", page.title, page.href);
//! }
//! # Ok(())
//! # }
//! ```

mod backend;
mod entry;
mod flatten;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod store;

pub use backend::{JsonManifestBackend, ManifestBackend, ManifestFile};
pub use entry::{Page, RouteEntry};
pub use flatten::{flatten, flatten_verbatim, join_href, normalize_href};
#[cfg(any(test, feature = "mock"))]
pub use mock::MemoryManifestBackend;
pub use store::{INTRODUCTION_TITLE, ManifestError, ManifestStore, chapter_order};
