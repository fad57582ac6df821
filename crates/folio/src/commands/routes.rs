//! `folio routes` command implementation.

use clap::Args;

use crate::commands::{GlobalArgs, open_manifest};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    /// Print the flattened pages as JSON.
    #[arg(long)]
    json: bool,
}

impl RoutesArgs {
    /// Execute the routes command.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let config = global.load_config(None)?;
        let pages = open_manifest(&config)?.pages();

        if self.json {
            output.data(&serde_json::to_string_pretty(&pages)?);
            return Ok(());
        }

        if pages.is_empty() {
            output.warning(&format!(
                "No pages in {}",
                config.paths.manifest_path.display()
            ));
            return Ok(());
        }

        let width = pages.iter().map(|p| p.href.len()).max().unwrap_or(0);
        for page in &pages {
            output.data(&format!("{:<width$}  {}", page.href, page.title));
        }
        Ok(())
    }
}
