//! # Leaf & Claim Extraction (MMR Profile)
//!
//! An MMR log commits each registered statement as a leaf:
//!
//! ```text
//! leaf = SHA-256(0x00 || subject[..24 chars] || be_u64(timestamp) || canonical-statement)
//! ```
//!
//! The subject comes from the *statement's* claims bag; the timestamp and
//! the log's own copy of the leaf digest come from the *receipt's*
//! unprotected header. [`extract_root_inputs`] recomputes the leaf,
//! requires it to be byte-equal to the stored copy, and pulls out the
//! confirmation key and inclusion proof needed to recompute the root.

use ciborium::value::Value;

use scitt_core::envelope::UNPROTECTED;
use scitt_core::header::value_kind;
use scitt_core::label::{
    CLAIM_CNF, CLAIM_SUB, CNF_COSE_KEY, CWT_CLAIMS, INCLUSION_PROOFS, MMR_LEAF_DIGEST,
    MMR_LEAF_TIMESTAMP, VDP,
};
use scitt_core::{sha256, to_hex, CanonicalBytes, Digest32, Envelope, HeaderMap, ScittError};
use scitt_crypto::cose_key::COSE_KEY;
use scitt_crypto::ConfirmationKey;

use crate::receipt::{DecodedReceipt, CLAIMS};

/// Domain-separation byte for leaf nodes.
pub const LEAF_TAG: u8 = 0x00;

/// Number of subject characters mixed into the leaf.
pub const SUBJECT_PREFIX_CHARS: usize = 24;

const CNF: &str = "cnf claim";
const PROOFS: &str = "verifiable data proofs";
const INCLUSION_PROOF: &str = "inclusion proof";

/// Inclusion-proof map keys.
const PROOF_INDEX: i64 = 1;
const PROOF_PATH: i64 = 2;

/// Everything needed to recompute and check an MMR receipt's root.
#[derive(Debug, Clone)]
pub struct RootInputs {
    /// Normalized confirmation key from the receipt's claims.
    pub key: ConfirmationKey,
    /// Leaf timestamp from the receipt.
    pub timestamp: u64,
    /// Leaf digest, recomputed and matched against the receipt's copy.
    pub leaf_digest: Digest32,
    /// Zero-based MMR index of the leaf.
    pub mmr_index: u64,
    /// Sibling digests, leaf upward.
    pub proof: Vec<Digest32>,
}

/// First [`SUBJECT_PREFIX_CHARS`] characters of `subject`.
pub fn subject_prefix(subject: &str) -> &str {
    match subject.char_indices().nth(SUBJECT_PREFIX_CHARS) {
        Some((end, _)) => &subject[..end],
        None => subject,
    }
}

/// Hash a leaf from its parts.
pub fn hash_leaf(subject: &str, timestamp: u64, statement: &[u8]) -> Digest32 {
    let prefix = subject_prefix(subject).as_bytes();
    let mut leaf = Vec::with_capacity(1 + prefix.len() + 8 + statement.len());
    leaf.push(LEAF_TAG);
    leaf.extend_from_slice(prefix);
    leaf.extend_from_slice(&timestamp.to_be_bytes());
    leaf.extend_from_slice(statement);
    sha256(&leaf)
}

/// Compute the MMR leaf digest of a canonical statement at `timestamp`.
///
/// # Errors
///
/// Fails if the statement's protected header has no claims bag or the
/// claims bag has no text subject.
pub fn leaf_digest(statement: &CanonicalBytes, timestamp: u64) -> Result<Digest32, ScittError> {
    let envelope = Envelope::from_slice(statement.as_bytes())?;
    let claims = envelope
        .decode_protected()?
        .require_map(CWT_CLAIMS, CLAIMS)?;
    let subject = claims.require_text(CLAIM_SUB)?;
    Ok(hash_leaf(subject, timestamp, statement.as_bytes()))
}

/// Extract the confirmation key, check the leaf digest, and read the
/// inclusion proof from an MMR receipt.
///
/// # Errors
///
/// - [`ScittError::LeafDigestMismatch`] if the recomputed leaf differs from
///   the receipt's stored copy.
/// - [`ScittError::KeyNormalization`] if the confirmation key is not EC2 /
///   P-256.
/// - [`ScittError::MissingLabel`] / [`ScittError::TypeMismatch`] /
///   [`ScittError::MalformedEnvelope`] for structurally invalid headers.
pub fn extract_root_inputs(
    statement: &CanonicalBytes,
    receipt: &DecodedReceipt<'_>,
) -> Result<RootInputs, ScittError> {
    let cose_key = receipt
        .claims()?
        .require_map(CLAIM_CNF, CNF)?
        .require_map(CNF_COSE_KEY, COSE_KEY)?;
    let key = ConfirmationKey::normalize(&cose_key)?;

    let unprotected = &receipt.envelope.unprotected;
    let timestamp = timestamp(unprotected)?;
    let computed = leaf_digest(statement, timestamp)?;
    let stored = unprotected.require_bytes(MMR_LEAF_DIGEST)?;
    if stored != computed.as_slice() {
        return Err(ScittError::LeafDigestMismatch {
            stored: to_hex(stored),
            computed: to_hex(&computed),
        });
    }

    let (mmr_index, proof) = inclusion_proof(unprotected)?;
    tracing::debug!(
        timestamp,
        mmr_index,
        proof_len = proof.len(),
        leaf = %to_hex(&computed),
        "extracted MMR root inputs"
    );

    Ok(RootInputs {
        key,
        timestamp,
        leaf_digest: computed,
        mmr_index,
        proof,
    })
}

fn timestamp(unprotected: &HeaderMap) -> Result<u64, ScittError> {
    match unprotected.require(MMR_LEAF_TIMESTAMP)? {
        Value::Integer(i) => u64::try_from(*i).map_err(|_| {
            ScittError::MalformedEnvelope(format!(
                "leaf timestamp {} is not an unsigned 64-bit integer",
                i128::from(*i)
            ))
        }),
        _ => Err(ScittError::TypeMismatch {
            label: MMR_LEAF_TIMESTAMP,
            location: UNPROTECTED,
            expected: "integer",
        }),
    }
}

/// Read `(index, siblings)` from the verifiable-data-proofs label.
///
/// The label holds either a map whose inclusion-proofs entry is the bundle,
/// or a sequence of bundles of which the last is used. The bundle's first
/// element is the inclusion proof, as `{1: index, 2: [siblings]}` or
/// `[_, index, [siblings]]`. Bundles and proofs may be byte-wrapped.
fn inclusion_proof(unprotected: &HeaderMap) -> Result<(u64, Vec<Digest32>), ScittError> {
    let proofs = unwrap_bytes(unprotected.require(VDP)?, PROOFS)?;
    let bundle = match proofs {
        Value::Map(entries) => HeaderMap::from_entries(entries, PROOFS)
            .require(INCLUSION_PROOFS)?
            .clone(),
        Value::Array(mut bundles) => bundles.pop().ok_or_else(|| {
            ScittError::MalformedEnvelope("verifiable data proofs list is empty".to_string())
        })?,
        other => {
            return Err(malformed(PROOFS, "map or array", &other));
        }
    };

    let proof = match unwrap_bytes(&bundle, PROOFS)? {
        Value::Array(items) => items.into_iter().next().ok_or_else(|| {
            ScittError::MalformedEnvelope("inclusion proof bundle is empty".to_string())
        })?,
        other => return Err(malformed("inclusion proof bundle", "array", &other)),
    };

    let (index, path) = match unwrap_bytes(&proof, INCLUSION_PROOF)? {
        Value::Map(entries) => {
            let map = HeaderMap::from_entries(entries, INCLUSION_PROOF);
            (
                map.require(PROOF_INDEX)?.clone(),
                map.require(PROOF_PATH)?.clone(),
            )
        }
        Value::Array(items) => {
            let len = items.len();
            let mut items = items.into_iter();
            match (items.next(), items.next(), items.next()) {
                (Some(_), Some(index), Some(path)) => (index, path),
                _ => {
                    return Err(ScittError::MalformedEnvelope(format!(
                        "inclusion proof must have 3 fields, found {len}"
                    )))
                }
            }
        }
        other => return Err(malformed(INCLUSION_PROOF, "map or array", &other)),
    };

    let index = match index {
        Value::Integer(i) => u64::try_from(i).map_err(|_| {
            ScittError::MalformedEnvelope(format!(
                "MMR index {} is not an unsigned 64-bit integer",
                i128::from(i)
            ))
        })?,
        other => return Err(malformed("MMR index", "unsigned integer", &other)),
    };

    let siblings = match path {
        Value::Array(items) => items,
        other => return Err(malformed("inclusion path", "array", &other)),
    };
    let proof = siblings
        .iter()
        .enumerate()
        .map(|(i, sibling)| match sibling {
            Value::Bytes(b) => Digest32::try_from(b.as_slice()).map_err(|_| {
                ScittError::MalformedEnvelope(format!(
                    "inclusion path element {i} must be 32 bytes, found {}",
                    b.len()
                ))
            }),
            other => Err(malformed("inclusion path element", "byte string", other)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((index, proof))
}

/// Clone a value, decoding it first if it is a byte-wrapped CBOR item.
fn unwrap_bytes(value: &Value, location: &str) -> Result<Value, ScittError> {
    match value {
        Value::Bytes(b) => ciborium::de::from_reader(b.as_slice()).map_err(|e| {
            ScittError::MalformedEnvelope(format!("{location} is not valid CBOR: {e}"))
        }),
        other => Ok(other.clone()),
    }
}

fn malformed(what: &str, expected: &str, found: &Value) -> ScittError {
    ScittError::MalformedEnvelope(format!(
        "{what} must be a {expected}, found {}",
        value_kind(found)
    ))
}
