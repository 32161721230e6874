//! Fixture builders: signed statements, a small in-memory MMR log, and
//! MMR-profile receipts signed with real P-256 keys.

#![allow(dead_code)]

use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};

use scitt_core::envelope::{PROTECTED, UNPROTECTED};
use scitt_core::label::{
    ALG, ALG_ES256, CLAIM_CNF, CLAIM_ISS, CLAIM_SUB, CNF_COSE_KEY, CWT_CLAIMS, INCLUSION_PROOFS,
    KEY_CRV, KEY_KID, KEY_KTY, KEY_X, KEY_Y, MMR_LEAF_DIGEST, MMR_LEAF_TIMESTAMP, PROFILE_MMR, VDP,
    VDS,
};
use scitt_core::{sha256, CanonicalBytes, Digest32, Envelope, HeaderMap, Value};
use scitt_crypto::mmr::{hash_pos_pair, included_root, index_height};
use scitt_crypto::sign1::sig_structure;
use scitt_verify::leaf_digest;

pub const STATEMENT_SUBJECT: &str = "https://example.com/artifacts/firmware/v1.4.2";
pub const TIMESTAMP: u64 = 1_700_000_000_000;

pub fn int(i: i64) -> Value {
    Value::Integer(i.into())
}

pub fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

/// A signed statement with no receipts. The statement signature is not
/// checked by receipt verification, so it is a placeholder.
pub fn statement(subject: &str, payload: &[u8]) -> Envelope {
    let claims = Value::Map(vec![
        (int(CLAIM_ISS), text("https://issuer.example")),
        (int(CLAIM_SUB), text(subject)),
    ]);
    let mut protected = HeaderMap::new(PROTECTED);
    protected.insert(ALG, int(ALG_ES256));
    protected.insert(CWT_CLAIMS, claims);
    Envelope {
        protected: protected.encode().unwrap(),
        unprotected: HeaderMap::new(UNPROTECTED),
        payload: Some(payload.to_vec()),
        signature: vec![0x5A; 64],
    }
}

pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).unwrap()
}

/// Append-only MMR over 32-byte leaves.
#[derive(Default)]
pub struct Mmr {
    nodes: Vec<Digest32>,
}

impl Mmr {
    /// Append a leaf and any parents it completes. Returns the leaf index.
    pub fn add(&mut self, leaf: Digest32) -> u64 {
        let index = self.nodes.len() as u64;
        self.nodes.push(leaf);
        let mut i = index;
        let mut g = 0u32;
        while index_height(i + 1) > g {
            let left = self.nodes[(i + 1 - (2u64 << g)) as usize];
            let right = self.nodes[i as usize];
            i += 1;
            self.nodes.push(hash_pos_pair(i + 1, &left, &right));
            g += 1;
        }
        index
    }

    pub fn add_filler(&mut self, count: usize) {
        for n in 0..count {
            let leaf = sha256(format!("filler-{}-{n}", self.nodes.len()).as_bytes());
            self.add(leaf);
        }
    }

    /// Siblings from `index` up to the peak containing it.
    pub fn proof(&self, index: u64) -> Vec<Digest32> {
        let len = self.nodes.len() as u64;
        let mut i = index;
        let mut g = index_height(i);
        let mut path = Vec::new();
        loop {
            let (sibling, parent) = if index_height(i + 1) > g {
                (i + 1 - (2u64 << g), i + 1)
            } else {
                (i + (2u64 << g) - 1, i + (2u64 << g))
            };
            if parent >= len {
                break;
            }
            path.push(self.nodes[sibling as usize]);
            i = parent;
            g += 1;
        }
        path
    }
}

/// How the inclusion proof is laid out under the proofs label.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ProofLayout {
    /// `{-1: [{1: index, 2: path}]}`
    Map,
    /// `[[[_, index, path]]]`, a sequence of bundles.
    Sequence,
    /// `{-1: [bstr .cbor {1: index, 2: path}]}`
    WrappedMap,
}

/// Builds an MMR-profile receipt for a statement.
pub struct ReceiptBuilder {
    pub log_key: SigningKey,
    /// Key placed in the receipt's cnf claim. Defaults to `log_key`.
    pub cnf_key: Option<SigningKey>,
    pub issuer: String,
    pub subject: String,
    pub timestamp: u64,
    pub leaves_before: usize,
    pub leaves_after: usize,
    pub layout: ProofLayout,
}

impl ReceiptBuilder {
    pub fn new(seed: u8, issuer: &str) -> Self {
        Self {
            log_key: signing_key(seed),
            cnf_key: None,
            issuer: issuer.to_string(),
            subject: "registered-statement".to_string(),
            timestamp: TIMESTAMP,
            leaves_before: 5,
            leaves_after: 2,
            layout: ProofLayout::Map,
        }
    }

    pub fn cose_key(&self) -> Value {
        let key = self.cnf_key.as_ref().unwrap_or(&self.log_key);
        let point = key.verifying_key().to_encoded_point(false);
        Value::Map(vec![
            (int(KEY_KTY), text("EC")),
            (int(KEY_KID), text("log-key")),
            (int(KEY_CRV), text("P-256")),
            (int(KEY_X), Value::Bytes(point.x().unwrap().to_vec())),
            (int(KEY_Y), Value::Bytes(point.y().unwrap().to_vec())),
        ])
    }

    pub fn protected(&self, cose_key: Value) -> HeaderMap {
        let claims = Value::Map(vec![
            (int(CLAIM_ISS), text(&self.issuer)),
            (int(CLAIM_SUB), text(&self.subject)),
            (int(CLAIM_CNF), Value::Map(vec![(int(CNF_COSE_KEY), cose_key)])),
        ]);
        let mut protected = HeaderMap::new(PROTECTED);
        protected.insert(ALG, int(ALG_ES256));
        protected.insert(VDS, int(PROFILE_MMR));
        protected.insert(CWT_CLAIMS, claims);
        protected
    }

    /// Log `statement` and return the signed receipt.
    pub fn build(&self, statement: &Envelope) -> Vec<u8> {
        self.build_with_protected(statement, self.protected(self.cose_key()))
    }

    pub fn build_with_protected(&self, statement: &Envelope, protected: HeaderMap) -> Vec<u8> {
        let canonical = CanonicalBytes::from_envelope(statement).unwrap();
        let leaf = leaf_digest(&canonical, self.timestamp).unwrap();

        let mut log = Mmr::default();
        log.add_filler(self.leaves_before);
        let index = log.add(leaf);
        log.add_filler(self.leaves_after);
        let path = log.proof(index);
        let root = included_root(index, &leaf, &path).unwrap();

        let protected_bytes = protected.encode().unwrap();
        let tbs = sig_structure(&protected_bytes, &[], &root).unwrap();
        let signature: Signature = self.log_key.sign(&tbs);

        let path_value = Value::Array(path.iter().map(|s| Value::Bytes(s.to_vec())).collect());
        let proofs = match self.layout {
            ProofLayout::Map => Value::Map(vec![(
                int(INCLUSION_PROOFS),
                Value::Array(vec![Value::Map(vec![
                    (int(1), int(index as i64)),
                    (int(2), path_value),
                ])]),
            )]),
            ProofLayout::Sequence => Value::Array(vec![Value::Array(vec![Value::Array(vec![
                Value::Null,
                int(index as i64),
                path_value,
            ])])]),
            ProofLayout::WrappedMap => {
                let proof = Value::Map(vec![(int(1), int(index as i64)), (int(2), path_value)]);
                let mut wrapped = Vec::new();
                ciborium::ser::into_writer(&proof, &mut wrapped).unwrap();
                Value::Map(vec![(
                    int(INCLUSION_PROOFS),
                    Value::Array(vec![Value::Bytes(wrapped)]),
                )])
            }
        };

        let mut unprotected = HeaderMap::new(UNPROTECTED);
        unprotected.insert(MMR_LEAF_TIMESTAMP, int(self.timestamp as i64));
        unprotected.insert(MMR_LEAF_DIGEST, Value::Bytes(leaf.to_vec()));
        unprotected.insert(VDP, proofs);

        Envelope {
            protected: protected_bytes,
            unprotected,
            payload: None,
            signature: signature.to_bytes().to_vec(),
        }
        .to_vec()
        .unwrap()
    }
}

/// Rewrite one unprotected-header label of a serialized receipt.
pub fn with_unprotected(receipt: &[u8], label: i64, value: Value) -> Vec<u8> {
    let mut envelope = Envelope::from_slice(receipt).unwrap();
    envelope.unprotected.insert(label, value);
    envelope.to_vec().unwrap()
}

/// A minimal receipt carrying only a profile id and an empty claims bag.
pub fn bare_receipt(profile: i64) -> Vec<u8> {
    let mut protected = HeaderMap::new(PROTECTED);
    protected.insert(VDS, int(profile));
    protected.insert(CWT_CLAIMS, Value::Map(vec![(int(CLAIM_ISS), text("https://ccf.example"))]));
    Envelope {
        protected: protected.encode().unwrap(),
        unprotected: HeaderMap::new(UNPROTECTED),
        payload: None,
        signature: vec![0; 64],
    }
    .to_vec()
    .unwrap()
}
