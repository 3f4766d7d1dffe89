//! Quire CLI - documentation site content pipeline.
//!
//! Provides commands for:
//! - `build`: Scan content and write the site manifest
//! - `nav`: Print the navigation tree
//! - `lookup`: Print the content record for a route
//! - `summary`: Print content counts per top-level directory

mod commands;
mod error;
mod output;

use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, LookupArgs, NavArgs, SummaryArgs};
use output::Output;

/// Quire - documentation site content pipeline.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan content and write the manifest.
    Build(BuildArgs),
    /// Print navigation as JSON.
    Nav(NavArgs),
    /// Print the content record for a route as JSON.
    Lookup(LookupArgs),
    /// Print content counts per top-level directory.
    Summary(SummaryArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Build(_) => "build",
            Self::Nav(_) => "nav",
            Self::Lookup(_) => "lookup",
            Self::Summary(_) => "summary",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.name();
    let started = Instant::now();
    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Nav(args) => args.execute(),
        Commands::Lookup(args) => args.execute(),
        Commands::Summary(args) => args.execute(),
    };

    match result {
        Ok(()) => {
            tracing::info!(
                command,
                elapsed_ms = started.elapsed().as_millis(),
                "Command finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(command, error = ?err, "Command failed");
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
