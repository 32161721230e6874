//! # Verification Dispatcher
//!
//! Verifies every receipt stapled to a statement:
//!
//! ```text
//! Start -> Canonicalize -> for each receipt { SelectProfile -> VerifyProfile } -> AllPassed | Failed
//! ```
//!
//! The statement is canonicalized once and the same bytes are shared by
//! every receipt. Receipts are independent, so with the `parallel` feature
//! they fan out across the rayon pool; results are gathered in array order
//! and the first failure *by index* is reported, so output does not depend
//! on scheduling. A single failing receipt fails the statement.

use serde::Serialize;

use scitt_core::{sha256_digest, to_hex, CanonicalBytes, Digest32, Envelope, ScittError};
use scitt_crypto::{included_root, verify_detached};

use crate::config::VerifierConfig;
use crate::error::VerificationError;
use crate::leaf::extract_root_inputs;
use crate::profile::Profile;
use crate::receipt::{DecodedReceipt, Identity};
use crate::trust::{TreeReceiptVerifier, TrustStore, UnconfiguredTrustStore, UnsupportedTreeVerifier};

/// Outcome of one verified receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptReport {
    /// Position in the receipts array.
    pub index: usize,
    /// Profile the receipt was verified under.
    pub profile: Profile,
    /// Issuer claim of the receipt.
    pub issuer: Option<String>,
    /// Subject claim of the receipt.
    pub subject: Option<String>,
}

/// Outcome of a fully verified statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatementReport {
    /// One entry per stapled receipt, in array order.
    pub receipts: Vec<ReceiptReport>,
}

/// A failed statement: the receipts that verified ahead of the first
/// failure, in array order, and the failure itself.
#[derive(Debug)]
pub struct PartialVerification {
    /// Receipts before the failing one.
    pub verified: Vec<ReceiptReport>,
    /// The first failure by receipt index.
    pub error: VerificationError,
}

impl From<VerificationError> for PartialVerification {
    fn from(error: VerificationError) -> Self {
        Self {
            verified: Vec::new(),
            error,
        }
    }
}

/// Receipt verifier.
pub struct Verifier {
    config: VerifierConfig,
    trust_store: Box<dyn TrustStore>,
    tree_verifier: Box<dyn TreeReceiptVerifier>,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new(VerifierConfig::default())
    }
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Verifier {
    /// Create a verifier whose tree-profile collaborators fail closed.
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            config,
            trust_store: Box::new(UnconfiguredTrustStore),
            tree_verifier: Box::new(UnsupportedTreeVerifier),
        }
    }

    /// Use `trust_store` for tree-profile service key lookups.
    pub fn with_trust_store(mut self, trust_store: impl TrustStore + 'static) -> Self {
        self.trust_store = Box::new(trust_store);
        self
    }

    /// Use `tree_verifier` for tree-profile receipts.
    pub fn with_tree_verifier(mut self, tree_verifier: impl TreeReceiptVerifier + 'static) -> Self {
        self.tree_verifier = Box::new(tree_verifier);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Parse a serialized transparent statement and verify it.
    pub fn verify_bytes(&self, statement: &[u8]) -> Result<StatementReport, VerificationError> {
        self.verify_bytes_with_progress(statement)
            .map_err(|partial| partial.error)
    }

    /// Like [`Verifier::verify_bytes`], but a failure also carries the
    /// receipts that verified before it.
    pub fn verify_bytes_with_progress(
        &self,
        statement: &[u8],
    ) -> Result<StatementReport, PartialVerification> {
        let envelope = Envelope::from_slice(statement).map_err(VerificationError::Statement)?;
        self.verify_with_progress(&envelope)
    }

    /// Verify every receipt stapled to `statement`.
    ///
    /// A statement with no receipts verifies with an empty report.
    pub fn verify(&self, statement: &Envelope) -> Result<StatementReport, VerificationError> {
        self.verify_with_progress(statement)
            .map_err(|partial| partial.error)
    }

    /// Like [`Verifier::verify`], but a failure also carries the receipts
    /// that verified before it.
    pub fn verify_with_progress(
        &self,
        statement: &Envelope,
    ) -> Result<StatementReport, PartialVerification> {
        let canonical =
            CanonicalBytes::from_envelope(statement).map_err(VerificationError::Statement)?;
        let receipts = statement.receipts().map_err(VerificationError::Statement)?;
        let claim_digest = sha256_digest(&canonical);
        tracing::debug!(
            receipts = receipts.len(),
            canonical_len = canonical.len(),
            claim_digest = %to_hex(&claim_digest),
            "canonicalized statement"
        );

        let outcomes = if self.config.parallel && receipts.len() > 1 {
            self.verify_parallel(&receipts, &canonical, &claim_digest)
        } else {
            self.verify_sequential(&receipts, &canonical, &claim_digest)
        };

        let mut verified = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Ok(report) => verified.push(report),
                Err(error) => return Err(PartialVerification { verified, error }),
            }
        }
        Ok(StatementReport { receipts: verified })
    }

    /// Outcomes in array order, stopping after the first failure.
    fn verify_sequential(
        &self,
        receipts: &[&[u8]],
        canonical: &CanonicalBytes,
        claim_digest: &Digest32,
    ) -> Vec<Result<ReceiptReport, VerificationError>> {
        let mut outcomes = Vec::with_capacity(receipts.len());
        for (index, receipt) in receipts.iter().enumerate() {
            let outcome = self.verify_receipt(index, receipt, canonical, claim_digest);
            let failed = outcome.is_err();
            outcomes.push(outcome);
            if failed {
                break;
            }
        }
        outcomes
    }

    #[cfg(feature = "parallel")]
    fn verify_parallel(
        &self,
        receipts: &[&[u8]],
        canonical: &CanonicalBytes,
        claim_digest: &Digest32,
    ) -> Vec<Result<ReceiptReport, VerificationError>> {
        use rayon::prelude::*;
        receipts
            .par_iter()
            .enumerate()
            .map(|(index, receipt)| self.verify_receipt(index, receipt, canonical, claim_digest))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn verify_parallel(
        &self,
        receipts: &[&[u8]],
        canonical: &CanonicalBytes,
        claim_digest: &Digest32,
    ) -> Vec<Result<ReceiptReport, VerificationError>> {
        self.verify_sequential(receipts, canonical, claim_digest)
    }

    fn verify_receipt(
        &self,
        index: usize,
        bytes: &[u8],
        canonical: &CanonicalBytes,
        claim_digest: &Digest32,
    ) -> Result<ReceiptReport, VerificationError> {
        let receipt = DecodedReceipt::decode(bytes)
            .map_err(|e| VerificationError::receipt(index, None, e))?;
        let profile = receipt
            .profile()
            .map_err(|e| VerificationError::receipt(index, None, e))?;
        tracing::info!(index, %profile, "found receipt");

        let in_profile = |e| VerificationError::receipt(index, Some(profile), e);
        let verified = match profile {
            Profile::Tree => self.verify_tree(&receipt, claim_digest),
            Profile::Mmr => verify_mmr(canonical, &receipt),
        };
        verified.map_err(in_profile)?;

        let identity = receipt
            .claims()
            .map(|claims| Identity::from_claims(&claims))
            .map_err(in_profile)?;
        tracing::info!(
            index,
            issuer = identity.issuer.as_deref().unwrap_or("-"),
            subject = identity.subject.as_deref().unwrap_or("-"),
            "verified receipt"
        );

        Ok(ReceiptReport {
            index,
            profile,
            issuer: identity.issuer,
            subject: identity.subject,
        })
    }

    fn verify_tree(
        &self,
        receipt: &DecodedReceipt<'_>,
        claim_digest: &Digest32,
    ) -> Result<(), ScittError> {
        self.tree_verifier
            .verify_receipt(receipt.bytes(), self.trust_store.as_ref(), claim_digest)
            .map_err(|e| match e {
                err @ (ScittError::TrustStoreLookup(_) | ScittError::ProofVerification(_)) => err,
                other => ScittError::ProofVerification(other.to_string()),
            })
    }
}

/// Recompute the MMR root from the receipt's inclusion proof and verify the
/// receipt's signature over it.
fn verify_mmr(canonical: &CanonicalBytes, receipt: &DecodedReceipt<'_>) -> Result<(), ScittError> {
    let inputs = extract_root_inputs(canonical, receipt)?;
    let root = included_root(inputs.mmr_index, &inputs.leaf_digest, &inputs.proof)?;
    tracing::debug!(root = %to_hex(&root), "implied MMR root");
    let key = inputs.key.verifying_key()?;
    verify_detached(&receipt.envelope, &receipt.protected, &key, &root)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scitt_core::envelope::{PROTECTED, UNPROTECTED};
    use scitt_core::label::{CWT_CLAIMS, VDS};
    use scitt_core::{staple, HeaderMap, Value};

    fn int(i: i64) -> Value {
        Value::Integer(i.into())
    }

    fn statement() -> Envelope {
        Envelope {
            protected: HeaderMap::new(PROTECTED).encode().unwrap(),
            unprotected: HeaderMap::new(UNPROTECTED),
            payload: Some(b"statement".to_vec()),
            signature: vec![1; 64],
        }
    }

    fn receipt_with_profile(profile: i64) -> Vec<u8> {
        let mut protected = HeaderMap::new(PROTECTED);
        protected.insert(VDS, int(profile));
        protected.insert(CWT_CLAIMS, Value::Map(vec![]));
        Envelope {
            protected: protected.encode().unwrap(),
            unprotected: HeaderMap::new(UNPROTECTED),
            payload: None,
            signature: vec![0; 64],
        }
        .to_vec()
        .unwrap()
    }

    #[test]
    fn no_receipts_verifies_trivially() {
        let report = Verifier::default().verify(&statement()).unwrap();
        assert!(report.receipts.is_empty());
    }

    #[test]
    fn unknown_profile_reported_with_index() {
        let stmt = staple(statement(), receipt_with_profile(99)).unwrap();
        let err = Verifier::default().verify(&stmt).unwrap_err();
        assert_eq!(err.receipt_index(), Some(0));
        assert!(matches!(err.kind(), ScittError::UnknownProfile(99)));
    }

    #[test]
    fn tree_profile_fails_closed_by_default() {
        let stmt = staple(statement(), receipt_with_profile(2)).unwrap();
        let err = Verifier::default().verify(&stmt).unwrap_err();
        assert!(matches!(err.kind(), ScittError::TrustStoreLookup(_)));
        assert!(matches!(
            err,
            VerificationError::Receipt {
                profile: Some(Profile::Tree),
                ..
            }
        ));
    }

    #[test]
    fn malformed_receipt_is_reported_without_profile() {
        let stmt = staple(statement(), receipt_with_profile(3)).unwrap();
        let mut stmt = stmt;
        stmt.unprotected
            .insert(scitt_core::label::RECEIPTS, Value::Array(vec![Value::Bytes(vec![0xff])]));
        let err = Verifier::new(VerifierConfig::sequential())
            .verify(&stmt)
            .unwrap_err();
        assert!(matches!(
            err,
            VerificationError::Receipt {
                index: 0,
                profile: None,
                source: ScittError::MalformedEnvelope(_),
            }
        ));
    }

    #[test]
    fn progress_keeps_receipts_before_the_failure() {
        let stmt = staple(statement(), receipt_with_profile(2)).unwrap();
        let stmt = staple(stmt, receipt_with_profile(7)).unwrap();
        let verifier = Verifier::new(VerifierConfig::sequential())
            .with_trust_store(AcceptingStore)
            .with_tree_verifier(AcceptingTree);
        let partial = verifier.verify_with_progress(&stmt).unwrap_err();
        assert_eq!(partial.verified.len(), 1);
        assert_eq!(partial.verified[0].profile, Profile::Tree);
        assert_eq!(partial.error.receipt_index(), Some(1));
    }

    #[test]
    fn progress_on_statement_error_is_empty() {
        let partial = Verifier::default()
            .verify_bytes_with_progress(b"not cbor")
            .unwrap_err();
        assert!(partial.verified.is_empty());
        assert!(matches!(partial.error, VerificationError::Statement(_)));
    }

    struct AcceptingStore;

    impl TrustStore for AcceptingStore {
        fn service_key(&self, _receipt: &[u8]) -> Result<Vec<u8>, ScittError> {
            Ok(vec![1])
        }
    }

    struct AcceptingTree;

    impl TreeReceiptVerifier for AcceptingTree {
        fn verify_receipt(
            &self,
            _receipt: &[u8],
            trust_store: &dyn TrustStore,
            _claim_digest: &Digest32,
        ) -> Result<(), ScittError> {
            trust_store.service_key(&[]).map(|_| ())
        }
    }

    #[test]
    fn malformed_statement_is_a_statement_error() {
        let err = Verifier::default().verify_bytes(b"not cbor").unwrap_err();
        assert!(matches!(err, VerificationError::Statement(_)));
        assert_eq!(err.receipt_index(), None);
    }
}
