//! gitdrill: rehearse multi-actor git collaboration against a shared remote.
//!
//! # Usage
//!
//! ```text
//! gitdrill run --project <ref> [--actor NAME] [--key PATH] [--config FILE] [--ssh]
//!              [--halt-on-failure] [--seed N] [--mirror URL] [--yes] [--json] [--root DIR]
//! gitdrill parse <ref> [--json]
//! gitdrill status [--root DIR] [--json]
//! ```

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use commands::{parse::ParseArgs, run::RunArgs, status::StatusArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "gitdrill",
    version,
    about = "Rehearse multi-actor git collaboration against a shared remote",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a scripted lesson: each level one actor edits, commits and pushes.
    Run(RunArgs),

    /// Show the canonical https and ssh forms of a project reference.
    Parse(ParseArgs),

    /// List actor homes and clones left under a lesson root.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<()> = match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Parse(args) => args.run(),
        Commands::Status(args) => args.run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` filter, `info` by default. Logs go to stderr so `--json`
/// output on stdout stays clean.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
