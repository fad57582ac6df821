//! `folio process-chapter` command implementation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use folio_config::Config;
use folio_import::{
    BatchReport, ChapterImporter, CommandConverter, CommandRebuilder, ImportEvent, ImportOutcome,
};

use crate::commands::{GlobalArgs, import_options, open_manifest};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the process-chapter command.
///
/// With no arguments, or a directory, every source file in it is imported
/// with a title derived from its file name. With a file and a title, that
/// single chapter is imported.
#[derive(Args)]
pub(crate) struct ProcessChapterArgs {
    /// Chapter directory (batch) or source file (single chapter).
    pub(crate) path: Option<PathBuf>,

    /// Chapter title (single-chapter mode).
    pub(crate) title: Option<String>,

    /// Rebuild the site after each import (overrides config).
    #[arg(long, overrides_with = "no_rebuild")]
    rebuild: bool,

    /// Do not rebuild the site (overrides config).
    #[arg(long)]
    no_rebuild: bool,
}

impl ProcessChapterArgs {
    /// Execute the process-chapter command.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<ExitCode, CliError> {
        let output = Output::new();
        let config = global.load_config(self.rebuild_override())?;
        let mut importer = create_importer(&config)?;

        match (self.path, self.title) {
            (Some(source), Some(title)) => {
                if title.trim().is_empty() {
                    return Err(CliError::Validation("chapter title cannot be empty".to_owned()));
                }
                output.info(&format!("Converting {}...", source.display()));
                let outcome = importer.import_chapter(&source, &title)?;
                print_outcome(&output, &outcome);
                Ok(ExitCode::SUCCESS)
            }
            (path, _) => {
                let dir = path.unwrap_or_else(|| config.paths.chapters_dir.clone());
                let report = run_batch(&output, &mut importer, &dir)?;
                Ok(if report.is_success() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                })
            }
        }
    }

    fn rebuild_override(&self) -> Option<bool> {
        if self.no_rebuild {
            Some(false)
        } else if self.rebuild {
            Some(true)
        } else {
            None
        }
    }
}

fn create_importer(config: &Config) -> Result<ChapterImporter, CliError> {
    let project_dir = config.paths.project_dir.clone();
    let converter = CommandConverter::new(config.converter.clone(), project_dir.clone());
    let manifest = open_manifest(config)?;

    let mut importer = ChapterImporter::new(Box::new(converter), manifest, import_options(config));
    if let Some(command) = config.rebuild.command() {
        importer = importer.with_rebuilder(Box::new(CommandRebuilder::new(command, project_dir)));
    }
    Ok(importer)
}

fn run_batch(
    output: &Output,
    importer: &mut ChapterImporter,
    dir: &Path,
) -> Result<BatchReport, CliError> {
    output.info(&format!("Scanning directory: {}", dir.display()));
    let extension = importer.options().extension.clone();

    let report = importer.import_all(dir, |event| match event {
        ImportEvent::Discovered { count: 0, dir } => {
            output.warning(&format!("No .{extension} files found in {}", dir.display()));
        }
        ImportEvent::Discovered { count, .. } => {
            output.info(&format!("Found {count} .{extension} files to process"));
        }
        ImportEvent::Started { source, title } => {
            output.info(&format!(
                "\nProcessing {} with title \"{title}\"...",
                file_name(source)
            ));
        }
        ImportEvent::Imported(outcome) => print_outcome(output, outcome),
        ImportEvent::Failed { source, error } => {
            output.error(&format!("Error processing chapter {}: {error}", source.display()));
        }
    })?;

    if report.total() > 0 {
        print_summary(output, &report);
    }
    Ok(report)
}

fn print_outcome(output: &Output, outcome: &ImportOutcome) {
    if outcome.inserted {
        output.success(&format!("Processed chapter \"{}\"", outcome.title));
    } else {
        output.warning(&format!(
            "Chapter \"{}\" already registered at {}, routes unchanged",
            outcome.title, outcome.page_href
        ));
    }
    output.field("Source", &outcome.source.display().to_string());
    output.field("Content", &outcome.output_dir.display().to_string());
    output.field("Route", &outcome.page_href);
}

fn print_summary(output: &Output, report: &BatchReport) {
    output.info("");
    output.separator();
    output.highlight("Processing complete!");
    output.success(&format!("Successfully processed: {} files", report.success_count));
    if report.fail_count > 0 {
        output.error(&format!("Failed to process: {} files", report.fail_count));
        for (path, message) in &report.failures {
            output.field(&file_name(path), message);
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
