//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Command strings support `${VAR}` and `${VAR:-default}` expansion:
//!
//! - `converter.program`, `converter.args`
//! - `rebuild.program`, `rebuild.args`
//!
//! ## Argument Placeholders
//!
//! `converter.args` must contain `{input}` (the chapter source file) and
//! `{output}` (the chapter content directory). They are substituted by the
//! importer, not here.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content store root.
    pub content_dir: Option<PathBuf>,
    /// Override route manifest path.
    pub manifest_path: Option<PathBuf>,
    /// Override rebuild enabled flag.
    pub rebuild_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Placeholder replaced with the chapter source file.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Placeholder replaced with the chapter output directory.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content store section (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Route manifest section.
    manifest: ManifestConfigRaw,
    /// Chapter import section.
    chapters: ChaptersConfigRaw,
    /// External converter command.
    pub converter: CommandConfig,
    /// External site rebuild command.
    pub rebuild: RebuildConfig,

    /// Resolved filesystem locations (set after loading).
    #[serde(skip)]
    pub paths: PathsConfig,
    /// Resolved chapter import settings (set after loading).
    #[serde(skip)]
    pub chapters_resolved: ChaptersConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ManifestConfigRaw {
    path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ChaptersConfigRaw {
    source_dir: Option<String>,
    extension: Option<String>,
    group_title: Option<String>,
    group_href: Option<String>,
    index_file: Option<String>,
}

/// Resolved filesystem locations.
#[derive(Debug, Default)]
pub struct PathsConfig {
    /// Directory external commands run in (the config file's directory).
    pub project_dir: PathBuf,
    /// Content store root; chapters are written below it.
    pub content_dir: PathBuf,
    /// Persisted route manifest.
    pub manifest_path: PathBuf,
    /// Default directory scanned by batch import.
    pub chapters_dir: PathBuf,
}

/// Resolved chapter import settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaptersConfig {
    /// Source file extension without the leading dot (matched case-insensitively).
    pub extension: String,
    /// Title of the navigation group that holds imported chapters.
    pub group_title: String,
    /// Href of that group; chapter content lives under `content_dir/<group_href>/<id>`.
    pub group_href: String,
    /// File the converter must produce inside the chapter directory.
    pub index_file: String,
}

impl Default for ChaptersConfig {
    fn default() -> Self {
        Self {
            extension: "tex".to_owned(),
            group_title: "Chapters".to_owned(),
            group_href: "/chapters".to_owned(),
            index_file: "index.mdx".to_owned(),
        }
    }
}

/// An external command: program plus argument list.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CommandConfig {
    /// Executable name or path.
    pub program: String,
    /// Arguments, possibly containing placeholders.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_owned(),
            args: vec![
                "scripts/convert_tex_to_md.py".to_owned(),
                INPUT_PLACEHOLDER.to_owned(),
                OUTPUT_PLACEHOLDER.to_owned(),
            ],
        }
    }
}

/// Site rebuild configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RebuildConfig {
    /// Whether a rebuild runs after each successful chapter import.
    pub enabled: bool,
    /// Executable name or path.
    pub program: String,
    /// Arguments.
    pub args: Vec<String>,
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            program: "npm".to_owned(),
            args: vec!["run".to_owned(), "build".to_owned()],
        }
    }
}

impl RebuildConfig {
    /// Command to run, or `None` when rebuilds are disabled.
    #[must_use]
    pub fn command(&self) -> Option<CommandConfig> {
        self.enabled.then(|| CommandConfig {
            program: self.program.clone(),
            args: self.args.clone(),
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`converter.program`").
        field: String,
        /// Error message (e.g., "${`PYTHON`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents,
    /// falling back to defaults rooted at the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content_dir) = &settings.content_dir {
            self.paths.content_dir.clone_from(content_dir);
        }
        if let Some(manifest_path) = &settings.manifest_path {
            self.paths.manifest_path.clone_from(manifest_path);
        }
        if let Some(enabled) = settings.rebuild_enabled {
            self.rebuild.enabled = enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            manifest: ManifestConfigRaw::default(),
            chapters: ChaptersConfigRaw::default(),
            converter: CommandConfig::default(),
            rebuild: RebuildConfig::default(),
            paths: PathsConfig {
                project_dir: base.to_path_buf(),
                content_dir: base.join("contents/docs"),
                manifest_path: base.join("routes.json"),
                chapters_dir: base.join("chapters"),
            },
            chapters_resolved: ChaptersConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        config.resolve(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_chapters()?;
        self.validate_converter()?;
        self.validate_rebuild()?;
        Ok(())
    }

    fn validate_chapters(&self) -> Result<(), ConfigError> {
        let chapters = &self.chapters_resolved;
        require_non_empty(&chapters.extension, "chapters.extension")?;
        if chapters.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "chapters.extension must not start with '.'".to_owned(),
            ));
        }
        require_non_empty(&chapters.group_title, "chapters.group_title")?;
        if !chapters.group_href.starts_with('/') {
            return Err(ConfigError::Validation(
                "chapters.group_href must start with '/'".to_owned(),
            ));
        }
        require_non_empty(&chapters.index_file, "chapters.index_file")?;
        Ok(())
    }

    fn validate_converter(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.converter.program, "converter.program")?;
        for placeholder in [INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER] {
            if !self.converter.args.iter().any(|a| a.contains(placeholder)) {
                return Err(ConfigError::Validation(format!(
                    "converter.args must contain {placeholder}"
                )));
            }
        }
        Ok(())
    }

    fn validate_rebuild(&self) -> Result<(), ConfigError> {
        // A disabled rebuild section may be left half-filled.
        if self.rebuild.enabled {
            require_non_empty(&self.rebuild.program, "rebuild.program")?;
        }
        Ok(())
    }

    /// Expand environment variable references in command strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.converter.program = expand::expand_env(&self.converter.program, "converter.program")?;
        self.converter.args = expand::expand_args(&self.converter.args, "converter.args")?;
        self.rebuild.program = expand::expand_env(&self.rebuild.program, "rebuild.program")?;
        self.rebuild.args = expand::expand_args(&self.rebuild.args, "rebuild.args")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory and fill defaults.
    fn resolve(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths = PathsConfig {
            project_dir: config_dir.to_path_buf(),
            content_dir: resolve(self.content.dir.as_deref(), "contents/docs"),
            manifest_path: resolve(self.manifest.path.as_deref(), "routes.json"),
            chapters_dir: resolve(self.chapters.source_dir.as_deref(), "chapters"),
        };

        let defaults = ChaptersConfig::default();
        let raw = &self.chapters;
        self.chapters_resolved = ChaptersConfig {
            extension: raw.extension.clone().unwrap_or(defaults.extension),
            group_title: raw.group_title.clone().unwrap_or(defaults.group_title),
            group_href: raw.group_href.clone().unwrap_or(defaults.group_href),
            index_file: raw.index_file.clone().unwrap_or(defaults.index_file),
        };
    }
}
