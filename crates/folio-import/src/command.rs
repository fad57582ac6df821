//! External conversion and rebuild steps.
//!
//! Both steps are traits so the importer can be driven by scripted fakes.
//! The command-backed implementations run a configured program to
//! completion from the project directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use folio_config::{CommandConfig, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};

/// Failure of an external step.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Program could not be started.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// Program exited unsuccessfully.
    #[error("{program} exited with {status}{}", format_stderr(.stderr))]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    /// Converter succeeded but did not produce the expected file.
    #[error("Converter produced no {}", .0.display())]
    MissingOutput(PathBuf),
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Converts one source document into a content directory.
pub trait DocumentConverter: Send + Sync {
    /// Convert `source` into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the conversion fails.
    fn convert(&self, source: &Path, output_dir: &Path) -> Result<(), ConvertError>;
}

/// Rebuilds the site after the manifest changed.
pub trait SiteRebuilder: Send + Sync {
    /// Run the rebuild to completion.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the rebuild fails.
    fn rebuild(&self) -> Result<(), ConvertError>;
}

/// Converter running an external program.
///
/// `{input}` and `{output}` in the arguments are replaced by the source path
/// and the output directory.
pub struct CommandConverter {
    command: CommandConfig,
    working_dir: PathBuf,
}

impl CommandConverter {
    /// Create a converter running `command` from `working_dir`.
    #[must_use]
    pub fn new(command: CommandConfig, working_dir: PathBuf) -> Self {
        Self {
            command,
            working_dir,
        }
    }

    fn args(&self, source: &Path, output_dir: &Path) -> Vec<String> {
        let input = source.to_string_lossy();
        let output = output_dir.to_string_lossy();
        self.command
            .args
            .iter()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }
}

impl DocumentConverter for CommandConverter {
    fn convert(&self, source: &Path, output_dir: &Path) -> Result<(), ConvertError> {
        let args = self.args(source, output_dir);
        tracing::debug!(program = %self.command.program, ?args, "Running converter");
        run(&self.command.program, &args, &self.working_dir)
    }
}

/// Rebuilder running an external program.
pub struct CommandRebuilder {
    command: CommandConfig,
    working_dir: PathBuf,
}

impl CommandRebuilder {
    /// Create a rebuilder running `command` from `working_dir`.
    #[must_use]
    pub fn new(command: CommandConfig, working_dir: PathBuf) -> Self {
        Self {
            command,
            working_dir,
        }
    }
}

impl SiteRebuilder for CommandRebuilder {
    fn rebuild(&self) -> Result<(), ConvertError> {
        tracing::debug!(program = %self.command.program, args = ?self.command.args, "Running rebuild");
        run(&self.command.program, &self.command.args, &self.working_dir)
    }
}

/// Run a program to completion, capturing stderr for the error.
fn run(program: &str, args: &[String], working_dir: &Path) -> Result<(), ConvertError> {
    let output = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ConvertError::Spawn {
            program: program.to_owned(),
            source,
        })?;

    if output.status.success() {
        return Ok(());
    }

    Err(ConvertError::Failed {
        program: program.to_owned(),
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
    })
}
