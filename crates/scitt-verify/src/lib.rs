//! # scitt-verify — Transparency Receipt Verification
//!
//! Verifies the receipts stapled to a transparent statement. Each receipt
//! names its own verification profile in its protected header:
//!
//! - **MMR (3)**: the leaf digest is recomputed from the canonical
//!   statement ([`leaf`]), the inclusion proof is applied to obtain the
//!   implied root, and the receipt's ES256 signature is checked over that
//!   root with the confirmation key the receipt carries.
//! - **Tree (2)**: delegated to a [`TreeReceiptVerifier`] with a
//!   [`TrustStore`] for the service key ([`trust`]).
//!
//! [`Verifier`] canonicalizes the statement once, verifies every receipt
//! (in parallel with the `parallel` feature), and succeeds only if all of
//! them verify.
//!
//! ## Example
//!
//! ```no_run
//! use scitt_verify::{Verifier, VerifierConfig};
//!
//! # fn run(bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let verifier = Verifier::new(VerifierConfig::from_env()?);
//! for receipt in verifier.verify_bytes(bytes)?.receipts {
//!     println!("{}: {:?}", receipt.profile, receipt.issuer);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod leaf;
pub mod profile;
pub mod receipt;
pub mod trust;

pub use config::{ConfigError, VerifierConfig};
pub use dispatcher::{PartialVerification, ReceiptReport, StatementReport, Verifier};
pub use error::VerificationError;
pub use leaf::{extract_root_inputs, hash_leaf, leaf_digest, RootInputs};
pub use profile::Profile;
pub use receipt::DecodedReceipt;
pub use trust::{TreeReceiptVerifier, TrustStore, UnconfiguredTrustStore, UnsupportedTreeVerifier};
