//! Page resolution and rendering for Folio.
//!
//! [`Resolver`] turns slug segments into a [`ResolvedPage`]: it looks the
//! slug up in a [`ContentStore`](folio_storage::ContentStore), renders the
//! body with [`MarkdownRenderer`], and picks the display title.
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use folio_site::Resolver;
//! use folio_storage::FsContentStore;
//!
//! let resolver = Resolver::new(Arc::new(FsContentStore::new("contents/docs".into())));
//! match resolver.resolve(&["chapters", "optics"])? {
//!     Some(page) => println!("{}", page.html),
//!     None => println!("not found"),
//! }
//! ```

mod render;
mod resolver;

pub use render::{MarkdownRenderer, RenderResult};
pub use resolver::{PageMetadata, ResolvedPage, Resolver, SiteError, static_slugs};
