//! Content storage abstraction for Folio.
//!
//! This crate provides a [`ContentStore`] trait for looking up chapter and
//! page content by slug, independent of where the content lives.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`ContentStore`] trait with a single `get()` lookup
//! - [`FsContentStore`] reading `index.mdx`/`index.md` files from a content root
//! - [`MemoryContentStore`] for testing (behind `mock` feature flag)
//! - [`StorageError`], shared with the route manifest backends
//! - [`split_frontmatter`] for the `---` fenced YAML header of content files
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use folio_storage::{ContentStore, FsContentStore};
//!
//! let store = FsContentStore::new(PathBuf::from("contents/docs"));
//! if let Some(doc) = store.get("chapters/heat_transfer")? {
//!     println!("{:?}", doc.frontmatter.title);
//! }
//! ```

mod frontmatter;
mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use frontmatter::{Frontmatter, FrontmatterError, split_frontmatter};
pub use fs::FsContentStore;
#[cfg(feature = "mock")]
pub use mock::MemoryContentStore;
pub use storage::{ContentStore, RawDocument, StorageError, StorageErrorKind};
