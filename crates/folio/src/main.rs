//! Folio CLI - chapter ingestion and route manifest toolkit.
//!
//! Provides commands for:
//! - `process-chapter`: Convert chapters and register them in the route manifest
//! - `update-routes`: Register a chapter route without converting
//! - `routes`: List the flattened navigation pages
//! - `show`: Resolve and render a page by slug

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{GlobalArgs, ProcessChapterArgs, RoutesArgs, ShowArgs, UpdateRoutesArgs};
use output::Output;

/// Folio - chapter ingestion and route manifest toolkit.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert chapters and add them to the route manifest.
    ProcessChapter(ProcessChapterArgs),
    /// Add a chapter route without converting.
    UpdateRoutes(UpdateRoutesArgs),
    /// List navigable pages from the route manifest.
    Routes(RoutesArgs),
    /// Resolve and render a page by slug.
    Show(ShowArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::ProcessChapter(args) => args.execute(&cli.global),
        Commands::UpdateRoutes(args) => args.execute(&cli.global).map(|()| ExitCode::SUCCESS),
        Commands::Routes(args) => args.execute(&cli.global).map(|()| ExitCode::SUCCESS),
        Commands::Show(args) => args.execute(&cli.global),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
