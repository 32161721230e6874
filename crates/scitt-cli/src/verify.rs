//! # Verify Subcommand
//!
//! Verifies the transparency of one or more statements. For each statement
//! every stapled receipt must verify; output per statement is
//!
//! ```text
//! Found receipt using profile: MMR (3)
//! Verified receipt from issuer (1): <iss>, subject (2): <sub>
//! Verified transparency of statement: <path>
//! ```
//!
//! A failed statement still lists the receipts that verified before the
//! failure, then `FAIL: <path>: <error>`.
//!
//! Files that do not exist or cannot be read are skipped with a warning.
//! The exit code is 0 only if at least one statement was read and every
//! statement read verified.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;

use scitt_verify::{
    PartialVerification, ReceiptReport, VerificationError, Verifier, VerifierConfig,
};

const ABSENT: &str = "(absent)";

/// Arguments for the `scitt verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Transparent statements to verify.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Verify receipts one at a time (overrides SCITT_VERIFY_PARALLEL).
    #[arg(long)]
    pub sequential: bool,

    /// Print one JSON object per statement instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable result for one statement.
#[derive(Debug, Serialize)]
struct StatementOutcome<'a> {
    statement: String,
    verified: bool,
    receipts: &'a [ReceiptReport],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let mut config = VerifierConfig::from_env().context("invalid verifier configuration")?;
    if args.sequential {
        config.parallel = false;
    }
    tracing::debug!(?config, "verifier configuration");
    let verifier = Verifier::new(config);
    let mut stdout = std::io::stdout().lock();
    verify_files(&verifier, &args.files, args.json, &mut stdout)
}

/// Verify each file with `verifier`, writing results to `out`.
pub fn verify_files(
    verifier: &Verifier,
    files: &[PathBuf],
    json: bool,
    out: &mut dyn Write,
) -> Result<u8> {
    let mut read = 0usize;
    let mut failed = 0usize;

    for path in files {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };
        read += 1;

        let shown = path.display().to_string();
        match verifier.verify_bytes_with_progress(&bytes) {
            Ok(report) => {
                if json {
                    let outcome = StatementOutcome {
                        statement: shown,
                        verified: true,
                        receipts: &report.receipts,
                        error: None,
                    };
                    writeln!(out, "{}", serde_json::to_string(&outcome)?)?;
                } else {
                    write_receipts(out, &report.receipts)?;
                    writeln!(out, "Verified transparency of statement: {shown}")?;
                }
            }
            Err(PartialVerification { verified, error }) => {
                failed += 1;
                tracing::error!(file = %path.display(), "{error}");
                if json {
                    let outcome = StatementOutcome {
                        statement: shown,
                        verified: false,
                        receipts: &verified,
                        error: Some(error.to_string()),
                    };
                    writeln!(out, "{}", serde_json::to_string(&outcome)?)?;
                } else {
                    write_receipts(out, &verified)?;
                    if let VerificationError::Receipt {
                        profile: Some(profile),
                        ..
                    } = &error
                    {
                        writeln!(out, "Found receipt using profile: {profile}")?;
                    }
                    writeln!(out, "FAIL: {shown}: {error}")?;
                }
            }
        }
    }

    if read == 0 {
        bail!("none of the {} statement file(s) could be read", files.len());
    }
    Ok(if failed == 0 { 0 } else { 1 })
}

fn write_receipts(out: &mut dyn Write, receipts: &[ReceiptReport]) -> std::io::Result<()> {
    for receipt in receipts {
        writeln!(out, "Found receipt using profile: {}", receipt.profile)?;
        writeln!(
            out,
            "Verified receipt from issuer (1): {}, subject (2): {}",
            receipt.issuer.as_deref().unwrap_or(ABSENT),
            receipt.subject.as_deref().unwrap_or(ABSENT),
        )?;
    }
    Ok(())
}
