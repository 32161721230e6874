//! # Staple Subcommand
//!
//! Appends receipts, in command-line order, to the receipts array of a
//! statement's unprotected header and writes the resulting transparent
//! statement to standard output or `--output`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use scitt_core::staple;

use crate::read_envelope;

/// Arguments for the `scitt staple` subcommand.
#[derive(Args, Debug)]
pub struct StapleArgs {
    /// Signed statement (COSE_Sign1).
    #[arg(value_name = "STATEMENT")]
    pub statement: PathBuf,

    /// Receipts to append, in order.
    #[arg(value_name = "RECEIPT", required = true)]
    pub receipts: Vec<PathBuf>,

    /// Write to this file instead of standard output.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Execute the staple subcommand.
pub fn run_staple(args: &StapleArgs) -> Result<u8> {
    let bytes = staple_files(&args.statement, &args.receipts)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            tracing::info!(output = %path.display(), "wrote transparent statement");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&bytes)
                .context("failed to write to standard output")?;
            stdout.flush().context("failed to flush standard output")?;
        }
    }
    Ok(0)
}

/// Staple each receipt file onto the statement file and serialize the result.
pub fn staple_files(statement: &Path, receipts: &[PathBuf]) -> Result<Vec<u8>> {
    let mut envelope = read_envelope(statement)?;
    for path in receipts {
        let receipt = std::fs::read(path)
            .with_context(|| format!("failed to read receipt: {}", path.display()))?;
        envelope = staple(envelope, receipt)
            .with_context(|| format!("failed to staple receipt: {}", path.display()))?;
        tracing::debug!(receipt = %path.display(), "stapled receipt");
    }
    Ok(envelope.to_vec()?)
}
