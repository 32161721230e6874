//! # Tree-Profile Collaborators
//!
//! Tree-profile (CCF) receipts are verified by an external Merkle-tree
//! implementation against a service key found through a trust-anchor
//! lookup. Neither lives in this crate; both are traits so a deployment can
//! plug in its own log client and trust store.
//!
//! The defaults fail closed: with no trust store configured, no tree
//! receipt verifies.

use scitt_core::{Digest32, ScittError};

/// Trust-anchor lookup for tree-profile receipts.
pub trait TrustStore: Send + Sync {
    /// Return the service key that signed `receipt`.
    ///
    /// Failures are [`ScittError::TrustStoreLookup`].
    fn service_key(&self, receipt: &[u8]) -> Result<Vec<u8>, ScittError>;
}

/// External verifier for tree-profile receipts.
pub trait TreeReceiptVerifier: Send + Sync {
    /// Verify `receipt` against the key `trust_store` returns, with
    /// `claim_digest` (SHA-256 of the canonical statement) as the expected
    /// detached payload.
    fn verify_receipt(
        &self,
        receipt: &[u8],
        trust_store: &dyn TrustStore,
        claim_digest: &Digest32,
    ) -> Result<(), ScittError>;
}

/// A trust store with no anchors. Every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredTrustStore;

impl TrustStore for UnconfiguredTrustStore {
    fn service_key(&self, _receipt: &[u8]) -> Result<Vec<u8>, ScittError> {
        Err(ScittError::TrustStoreLookup(
            "no trust store is configured for tree-profile receipts".to_string(),
        ))
    }
}

/// A tree verifier that consults the trust store and then rejects: no
/// CCF Merkle-tree implementation is linked in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedTreeVerifier;

impl TreeReceiptVerifier for UnsupportedTreeVerifier {
    fn verify_receipt(
        &self,
        receipt: &[u8],
        trust_store: &dyn TrustStore,
        _claim_digest: &Digest32,
    ) -> Result<(), ScittError> {
        trust_store.service_key(receipt)?;
        Err(ScittError::ProofVerification(
            "tree-profile receipts are not supported by this build".to_string(),
        ))
    }
}
