//! Chapter import for Folio.
//!
//! Converts source documents into content directories through an external
//! [`DocumentConverter`], registers each chapter in the route manifest, and
//! optionally runs a [`SiteRebuilder`] afterwards.
//!
//! - [`ChapterImporter::import_chapter`]: one file with an explicit title
//! - [`ChapterImporter::import_all`]: every matching file in a directory,
//!   titles derived with [`derive_title`]

mod command;
mod importer;
mod title;

pub use command::{
    CommandConverter, CommandRebuilder, ConvertError, DocumentConverter, SiteRebuilder,
};
pub use importer::{
    BatchReport, ChapterImporter, ImportError, ImportEvent, ImportOptions, ImportOutcome,
    register_chapter,
};
pub use title::{chapter_id, derive_title};
