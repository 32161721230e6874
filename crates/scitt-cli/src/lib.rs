//! # scitt-cli — Receipt Tooling
//!
//! Provides the `scitt` command-line interface over the verification
//! workspace. Every subcommand reads COSE_Sign1 files from disk and writes
//! results to standard output; exit code 0 means success, 1 means a usage
//! error or a failed verification.
//!
//! ## Subcommands
//!
//! - `scitt staple`: append receipts to a statement's receipts header.
//! - `scitt strip`: write `<FILE>.empty_uhdr`, the statement with its
//!   unprotected header emptied.
//! - `scitt verify`: verify the transparency of statements.
//!
//! ```bash
//! scitt staple statement.cose receipt-a.cose receipt-b.cose > transparent.cose
//! scitt verify transparent.cose
//! ```

pub mod staple;
pub mod strip;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};

use scitt_core::Envelope;

/// Read and parse a COSE_Sign1 file.
pub fn read_envelope(path: &Path) -> Result<Envelope> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read file: {}", path.display()))?;
    Envelope::from_slice(&bytes)
        .with_context(|| format!("failed to parse COSE_Sign1: {}", path.display()))
}
