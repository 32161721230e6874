//! # scitt CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scitt_cli::staple::{run_staple, StapleArgs};
use scitt_cli::strip::{run_strip, StripArgs};
use scitt_cli::verify::{run_verify, VerifyArgs};

/// Compose and verify SCITT transparency receipts.
///
/// Staples receipts onto signed statements, strips the unprotected header
/// to recover the signed bytes, and verifies every receipt stapled to a
/// transparent statement (MMR profile locally, CCF tree profile through a
/// configured collaborator).
#[derive(Parser, Debug)]
#[command(name = "scitt", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append receipts to a statement's receipts header.
    Staple(StapleArgs),

    /// Write a copy of a statement with an empty unprotected header.
    Strip(StripArgs),

    /// Verify every receipt stapled to one or more statements.
    Verify(VerifyArgs),
}

/// Exit code for an argument parsing failure: 0 for `--help` and
/// `--version`, 1 for usage errors.
fn parse_error_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Printing only fails if the terminal is gone.
            let _ = e.print();
            return ExitCode::from(parse_error_code(&e));
        }
    };

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("scitt CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Staple(args) => run_staple(&args),
        Commands::Strip(args) => run_strip(&args),
        Commands::Verify(args) => run_verify(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
