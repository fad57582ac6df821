//! `folio show` command implementation.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use folio_site::Resolver;
use folio_storage::FsContentStore;

use crate::commands::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Exit status for a slug with no content.
const NOT_FOUND: u8 = 2;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Slug segments (`chapters optics`) or a slash-separated slug
    /// (`chapters/optics`). Empty for the root page.
    slug: Vec<String>,

    /// Print only title and description.
    #[arg(long)]
    meta: bool,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

impl ShowArgs {
    /// Execute the show command.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<ExitCode, CliError> {
        let output = Output::new();
        let config = global.load_config(None)?;
        let store = FsContentStore::new(config.paths.content_dir.clone());
        let resolver = Resolver::new(Arc::new(store));

        let segments: Vec<&str> = self
            .slug
            .iter()
            .flat_map(|s| s.split('/'))
            .filter(|s| !s.is_empty())
            .collect();
        let slug = segments.join("/");

        if self.meta {
            let Some(meta) = resolver.metadata(&segments)? else {
                return Ok(not_found(&output, &slug));
            };
            if self.json {
                output.data(&serde_json::to_string_pretty(&meta)?);
            } else {
                output.data(&format!("title: {}", meta.title));
                if let Some(description) = &meta.description {
                    output.data(&format!("description: {description}"));
                }
            }
            return Ok(ExitCode::SUCCESS);
        }

        let Some(page) = resolver.resolve(&segments)? else {
            return Ok(not_found(&output, &slug));
        };
        if self.json {
            output.data(&serde_json::to_string_pretty(&page)?);
        } else {
            output.highlight(&page.title);
            if let Some(description) = &page.description {
                output.info(description);
            }
            output.separator();
            output.data(page.html.trim_end());
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn not_found(output: &Output, slug: &str) -> ExitCode {
    output.error(&format!("Page not found: /{slug}"));
    ExitCode::from(NOT_FOUND)
}
