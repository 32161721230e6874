//! # Canonical Bytes: Detached-Payload Canonicalization
//!
//! `CanonicalBytes` is the sole construction path for the bytes a statement
//! signer committed to. The unprotected header is mutable after signing
//! (receipts are stapled into it), so the signed form is recovered by
//! re-serializing the envelope with the unprotected header replaced by an
//! empty mapping.
//!
//! ## Security Invariant
//!
//! The inner `Vec<u8>` is private. Leaf digests and tree-profile claim
//! digests take `&CanonicalBytes`, so a transparent statement with receipts
//! still attached cannot be hashed by mistake.
//!
//! Canonicalization works on a copy: the caller's decoded envelope is never
//! left in the header-stripped state.

use crate::envelope::{Envelope, UNPROTECTED};
use crate::error::ScittError;
use crate::header::HeaderMap;

/// Bytes of an envelope serialized with an empty unprotected header.
///
/// # Invariants
///
/// - The only constructors are [`CanonicalBytes::from_envelope`] and
///   [`canonicalize`].
/// - Canonicalizing the envelope decoded from these bytes yields identical
///   bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize an envelope.
    pub fn from_envelope(envelope: &Envelope) -> Result<Self, ScittError> {
        let mut signed = envelope.clone();
        signed.unprotected = HeaderMap::new(UNPROTECTED);
        Ok(Self(signed.to_vec()?))
    }

    /// Parse serialized bytes and canonicalize them.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ScittError> {
        Self::from_envelope(&Envelope::from_slice(bytes)?)
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take ownership of the bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Canonicalize an envelope. Equivalent to [`CanonicalBytes::from_envelope`].
pub fn canonicalize(envelope: &Envelope) -> Result<CanonicalBytes, ScittError> {
    CanonicalBytes::from_envelope(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::RECEIPTS;
    use ciborium::value::{Integer, Value};

    fn statement() -> Envelope {
        let mut protected = Vec::new();
        ciborium::ser::into_writer(
            &Value::Map(vec![(
                Value::Integer(Integer::from(1)),
                Value::Integer(Integer::from(-7)),
            )]),
            &mut protected,
        )
        .unwrap();
        let mut unprotected = HeaderMap::new(UNPROTECTED);
        unprotected.insert(4, Value::Bytes(b"kid".to_vec()));
        unprotected.insert(
            RECEIPTS,
            Value::Array(vec![Value::Bytes(vec![1, 2, 3])]),
        );
        Envelope {
            protected,
            unprotected,
            payload: Some(b"{\"hello\":\"world\"}".to_vec()),
            signature: vec![7u8; 64],
        }
    }

    #[test]
    fn test_unprotected_header_emptied() {
        let canonical = canonicalize(&statement()).unwrap();
        let parsed = Envelope::from_slice(canonical.as_bytes()).unwrap();
        assert!(parsed.unprotected.is_empty());
    }

    #[test]
    fn test_other_fields_untouched() {
        let original = statement();
        let parsed =
            Envelope::from_slice(canonicalize(&original).unwrap().as_bytes()).unwrap();
        assert_eq!(parsed.protected, original.protected);
        assert_eq!(parsed.payload, original.payload);
        assert_eq!(parsed.signature, original.signature);
    }

    #[test]
    fn test_caller_envelope_not_mutated() {
        let original = statement();
        let before = original.clone();
        let _ = canonicalize(&original).unwrap();
        assert_eq!(original, before);
        assert!(original.unprotected.contains(RECEIPTS));
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let once = canonicalize(&statement()).unwrap();
        let twice = CanonicalBytes::from_slice(once.as_bytes()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_deterministic() {
        let a = canonicalize(&statement()).unwrap();
        let b = canonicalize(&statement()).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_receipts_do_not_affect_canonical_bytes() {
        let with = statement();
        let mut without = statement();
        without.unprotected = HeaderMap::new(UNPROTECTED);
        assert_eq!(canonicalize(&with).unwrap(), canonicalize(&without).unwrap());
    }

    #[test]
    fn test_empty_unprotected_encodes_as_empty_map() {
        let canonical = canonicalize(&statement()).unwrap();
        // The second array item follows the protected bstr and must be 0xA0.
        let protected_len = statement().protected.len();
        // tag (1) + array header (1) + bstr header (1) + protected bytes
        assert_eq!(canonical.as_bytes()[3 + protected_len], 0xA0);
    }
}
