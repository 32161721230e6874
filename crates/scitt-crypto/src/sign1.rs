//! # COSE_Sign1 Detached-Payload Verification
//!
//! An MMR receipt does not carry its payload: the payload is the implied
//! root recomputed by the verifier. The signature covers the COSE
//! `Sig_structure`:
//!
//! ```text
//! ["Signature1", protected-bytes, external_aad = h'', payload]
//! ```
//!
//! Only ES256 (ECDSA P-256 with SHA-256, raw 64-byte `r || s`) is accepted,
//! matching the EC2 / P-256 confirmation keys normalized in
//! [`crate::cose_key`].

use ciborium::value::Value;
use p256::ecdsa::signature::Verifier;
use p256::ecdsa::{Signature, VerifyingKey};

use scitt_core::label::{ALG, ALG_ES256};
use scitt_core::{Envelope, HeaderMap};

use crate::error::CryptoError;

/// Context string for single-signer signatures.
const SIGNATURE1: &str = "Signature1";

/// Serialize the COSE `Sig_structure` for a single-signer envelope.
pub fn sig_structure(
    protected: &[u8],
    external_aad: &[u8],
    payload: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let structure = Value::Array(vec![
        Value::Text(SIGNATURE1.to_string()),
        Value::Bytes(protected.to_vec()),
        Value::Bytes(external_aad.to_vec()),
        Value::Bytes(payload.to_vec()),
    ]);
    let mut out = Vec::new();
    ciborium::ser::into_writer(&structure, &mut out)
        .map_err(|e| CryptoError::Encoding(e.to_string()))?;
    Ok(out)
}

/// Verify `envelope`'s signature with `payload` supplied as the detached
/// payload.
///
/// `protected` is the envelope's already-decoded protected header; its `alg`,
/// when present, must be ES256.
///
/// # Errors
///
/// - [`CryptoError::UnsupportedAlgorithm`] if `alg` is not ES256.
/// - [`CryptoError::InvalidSignature`] if the signature is not 64 bytes.
/// - [`CryptoError::VerificationFailed`] if ECDSA verification fails.
pub fn verify_detached(
    envelope: &Envelope,
    protected: &HeaderMap,
    key: &VerifyingKey,
    payload: &[u8],
) -> Result<(), CryptoError> {
    if protected.contains(ALG) {
        match protected.require_int(ALG) {
            Ok(ALG_ES256) => {}
            Ok(other) => {
                return Err(CryptoError::UnsupportedAlgorithm(format!(
                    "alg {other}, expected ES256 ({ALG_ES256})"
                )))
            }
            Err(e) => return Err(CryptoError::UnsupportedAlgorithm(e.to_string())),
        }
    }

    let signature = Signature::from_slice(&envelope.signature).map_err(|_| {
        CryptoError::InvalidSignature(format!(
            "expected 64-byte r || s, found {} bytes",
            envelope.signature.len()
        ))
    })?;

    let to_be_signed = sig_structure(&envelope.protected, &[], payload)?;
    tracing::trace!(tbs_len = to_be_signed.len(), "verifying ES256 signature");

    key.verify(&to_be_signed, &signature)
        .map_err(|e| CryptoError::VerificationFailed(e.to_string()))
}
