//! # Strip Subcommand
//!
//! Writes `<FILE>.empty_uhdr`: the statement re-serialized with an empty
//! unprotected header. These are the canonical bytes a receipt's leaf
//! digest is computed over, which makes the file useful when debugging a
//! leaf digest mismatch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use scitt_core::canonicalize;

use crate::read_envelope;

/// Suffix appended to the input path.
pub const STRIPPED_SUFFIX: &str = ".empty_uhdr";

/// Arguments for the `scitt strip` subcommand.
#[derive(Args, Debug)]
pub struct StripArgs {
    /// COSE_Sign1 file to strip.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute the strip subcommand.
pub fn run_strip(args: &StripArgs) -> Result<u8> {
    let output = strip_file(&args.file)?;
    println!(
        "COSE with empty unprotected header written to {}",
        output.display()
    );
    Ok(0)
}

/// Strip `path` and return the path written.
pub fn strip_file(path: &Path) -> Result<PathBuf> {
    let envelope = read_envelope(path)?;
    let canonical = canonicalize(&envelope)?;
    let output = stripped_path(path);
    std::fs::write(&output, canonical.as_bytes())
        .with_context(|| format!("failed to write output: {}", output.display()))?;
    Ok(output)
}

/// `<path>.empty_uhdr`.
pub fn stripped_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(STRIPPED_SUFFIX);
    PathBuf::from(name)
}
