//! # Cryptographic Error Types
//!
//! Structured errors for `scitt-crypto`. Each converts into the matching
//! [`ScittError`] kind at the verification boundary.

use scitt_core::ScittError;
use thiserror::Error;

/// Errors from cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The confirmation key is not an EC2 / P-256 key or is missing a field.
    #[error("invalid confirmation key: {0}")]
    InvalidKey(String),

    /// Unsupported or missing signature algorithm.
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Signature bytes are not a 64-byte `r || s` ECDSA P-256 signature.
    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    /// ECDSA verification failed.
    #[error("ES256 verification failed: {0}")]
    VerificationFailed(String),

    /// MMR index arithmetic overflowed while applying a proof.
    #[error("MMR error: {0}")]
    Mmr(String),

    /// CBOR encoding of a key or signature structure failed.
    #[error("CBOR encoding error: {0}")]
    Encoding(String),
}

impl From<CryptoError> for ScittError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidKey(msg) => ScittError::KeyNormalization(msg),
            CryptoError::Encoding(msg) => ScittError::Encoding(msg),
            other => ScittError::ProofVerification(other.to_string()),
        }
    }
}
