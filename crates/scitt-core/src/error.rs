//! # Error Types
//!
//! Every check in the verification pipeline maps to one named variant here.
//! Nothing is recovered or retried: transparency verification fails closed,
//! and the caller decides whether to report and continue with the next
//! statement.

use thiserror::Error;

/// Top-level error type for envelope handling and receipt verification.
#[derive(Error, Debug)]
pub enum ScittError {
    /// Wrong tag, wrong arity, or a positional field of the wrong type.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// A required header label is absent.
    #[error("missing label {label} in {location}")]
    MissingLabel {
        /// The integer label that was looked up.
        label: i64,
        /// Which mapping was searched (e.g. "protected header", "claims").
        location: &'static str,
    },

    /// A header label is present but holds a value of the wrong type.
    #[error("label {label} in {location} has the wrong type: expected {expected}")]
    TypeMismatch {
        /// The integer label that was looked up.
        label: i64,
        /// Which mapping was searched.
        location: &'static str,
        /// Human-readable name of the expected CBOR type.
        expected: &'static str,
    },

    /// The confirmation key is not an EC2 / P-256 key.
    #[error("confirmation key normalization failed: {0}")]
    KeyNormalization(String),

    /// The recomputed leaf digest differs from the one stored in the receipt.
    #[error("leaf digest mismatch: receipt carries {stored}, recomputed {computed}")]
    LeafDigestMismatch {
        /// Hex of the digest stored under the leaf-digest label.
        stored: String,
        /// Hex of the digest recomputed from the statement.
        computed: String,
    },

    /// The receipt signature over the implied root does not verify, or the
    /// tree-profile collaborator rejected the receipt.
    #[error("proof verification failed: {0}")]
    ProofVerification(String),

    /// The receipt's profile id selects no known verification algorithm.
    #[error("unknown receipt profile: {0}")]
    UnknownProfile(i64),

    /// The trust-anchor lookup for a tree-profile receipt failed.
    #[error("trust store lookup failed: {0}")]
    TrustStoreLookup(String),

    /// CBOR serialization of an envelope or structure failed.
    #[error("CBOR encoding error: {0}")]
    Encoding(String),
}
