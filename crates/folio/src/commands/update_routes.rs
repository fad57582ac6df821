//! `folio update-routes` command implementation.

use clap::Args;
use folio_import::register_chapter;
use folio_routes::{join_href, normalize_href};

use crate::commands::{GlobalArgs, import_options, open_manifest};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the update-routes command.
///
/// Registers a chapter in the route manifest without converting anything.
#[derive(Args)]
pub(crate) struct UpdateRoutesArgs {
    /// Chapter title.
    title: String,

    /// Chapter href relative to the chapters group (e.g. `/optics`).
    ///
    /// A missing leading `/` is added and trailing slashes are dropped.
    href: String,
}

impl UpdateRoutesArgs {
    /// Execute the update-routes command.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();

        if self.title.trim().is_empty() {
            return Err(CliError::Validation("chapter title cannot be empty".to_owned()));
        }
        let href = normalize_href(&self.href).ok_or_else(|| {
            CliError::Validation(format!("chapter href needs a path segment: {:?}", self.href))
        })?;

        let config = global.load_config(None)?;
        let options = import_options(&config);
        let mut manifest = open_manifest(&config)?;

        let page_href = join_href(&options.group_href, &href);
        if register_chapter(&mut manifest, &options, &self.title, &href)? {
            output.success(&format!("Updated routes with new chapter: {}", self.title));
            output.field("Route", &page_href);
            output.field("Manifest", &config.paths.manifest_path.display().to_string());
        } else {
            output.warning(&format!("Route {page_href} already exists, routes unchanged"));
        }
        Ok(())
    }
}
