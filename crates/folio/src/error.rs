//! CLI error types.

use folio_config::ConfigError;
use folio_import::ImportError;
use folio_routes::ManifestError;
use folio_site::SiteError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Import(#[from] ImportError),

    #[error("{0}")]
    Manifest(#[from] ManifestError),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
