//! CLI command implementations.

pub(crate) mod process_chapter;
pub(crate) mod routes;
pub(crate) mod show;
pub(crate) mod update_routes;

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_import::ImportOptions;
use folio_routes::{JsonManifestBackend, ManifestStore};

use crate::error::CliError;

pub(crate) use process_chapter::ProcessChapterArgs;
pub(crate) use routes::RoutesArgs;
pub(crate) use show::ShowArgs;
pub(crate) use update_routes::UpdateRoutesArgs;

/// Options shared by every command.
#[derive(Args, Debug)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Content directory (overrides config).
    #[arg(long, global = true, env = "FOLIO_CONTENT_DIR")]
    pub(crate) content_dir: Option<PathBuf>,

    /// Route manifest file (overrides config).
    #[arg(long, global = true, env = "FOLIO_MANIFEST")]
    pub(crate) manifest: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,
}

impl GlobalArgs {
    /// Load configuration with command-line overrides applied.
    pub(crate) fn load_config(&self, rebuild_enabled: Option<bool>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            content_dir: self.content_dir.clone(),
            manifest_path: self.manifest.clone(),
            rebuild_enabled,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Open the route manifest configured in `config`.
pub(crate) fn open_manifest(config: &Config) -> Result<ManifestStore, CliError> {
    let backend = JsonManifestBackend::new(config.paths.manifest_path.clone());
    Ok(ManifestStore::open(Box::new(backend))?)
}

/// Chapter import options from `config`.
pub(crate) fn import_options(config: &Config) -> ImportOptions {
    let chapters = &config.chapters_resolved;
    ImportOptions {
        content_dir: config.paths.content_dir.clone(),
        group_title: chapters.group_title.clone(),
        group_href: chapters.group_href.clone(),
        extension: chapters.extension.clone(),
        index_file: chapters.index_file.clone(),
    }
}
