//! # Confirmation Keys
//!
//! MMR receipts carry the log's signing key inside the CWT claims bag
//! (`claims[8][1]`, a COSE_Key). Some producers write the key type and
//! curve as names ("EC", "P-256") and the key id as text. The strict form
//! expected by COSE verification uses the registered integers (`kty` 2,
//! `crv` 1) and a byte-string `kid`; [`ConfirmationKey::normalize`]
//! rewrites the key into that form and rejects anything that is not an
//! EC2 P-256 key.

use ciborium::value::{Integer, Value};
use p256::ecdsa::VerifyingKey;

use scitt_core::label::{CRV_P256, KEY_CRV, KEY_KID, KEY_KTY, KEY_X, KEY_Y, KTY_EC2};
use scitt_core::HeaderMap;

use crate::error::CryptoError;

/// Location name of a COSE_Key in error messages.
pub const COSE_KEY: &str = "COSE_Key";

/// Length of a P-256 affine coordinate.
const COORDINATE_LEN: usize = 32;

/// A normalized EC2 / P-256 confirmation key.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationKey {
    entries: HeaderMap,
    x: Vec<u8>,
    y: Vec<u8>,
    kid: Option<Vec<u8>>,
}

impl ConfirmationKey {
    /// Normalize a decoded COSE_Key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if `kty` is not `"EC"` / 2, `crv`
    /// is not `"P-256"` / 1, the coordinates are missing or not 32 bytes,
    /// or `kid` has an unusable type.
    pub fn normalize(key: &HeaderMap) -> Result<Self, CryptoError> {
        let mut entries = key.clone();

        match key.get(KEY_KTY) {
            Some(Value::Text(t)) if t == "EC" => {}
            Some(Value::Integer(i)) if i128::from(*i) == i128::from(KTY_EC2) => {}
            Some(other) => {
                return Err(CryptoError::InvalidKey(format!(
                    "kty must be EC (2), found {other:?}"
                )))
            }
            None => return Err(CryptoError::InvalidKey("kty is missing".to_string())),
        }
        entries.insert(KEY_KTY, Value::Integer(Integer::from(KTY_EC2)));

        match key.get(KEY_CRV) {
            Some(Value::Text(t)) if t == "P-256" => {}
            Some(Value::Integer(i)) if i128::from(*i) == i128::from(CRV_P256) => {}
            Some(other) => {
                return Err(CryptoError::InvalidKey(format!(
                    "crv must be P-256 (1), found {other:?}"
                )))
            }
            None => return Err(CryptoError::InvalidKey("crv is missing".to_string())),
        }
        entries.insert(KEY_CRV, Value::Integer(Integer::from(CRV_P256)));

        let kid = match key.get(KEY_KID) {
            None => None,
            Some(Value::Bytes(b)) => Some(b.clone()),
            Some(Value::Text(t)) => Some(t.as_bytes().to_vec()),
            Some(Value::Integer(i)) => Some(i128::from(*i).to_string().into_bytes()),
            Some(other) => {
                return Err(CryptoError::InvalidKey(format!(
                    "kid must be a byte or text string, found {other:?}"
                )))
            }
        };
        if let Some(kid) = &kid {
            entries.insert(KEY_KID, Value::Bytes(kid.clone()));
        }

        let x = coordinate(key, KEY_X, "x")?;
        let y = coordinate(key, KEY_Y, "y")?;

        Ok(Self { entries, x, y, kid })
    }

    /// Decode a serialized COSE_Key and normalize it.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key = HeaderMap::decode(bytes, COSE_KEY)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Self::normalize(&key)
    }

    /// Serialize the normalized key.
    pub fn to_cbor(&self) -> Result<Vec<u8>, CryptoError> {
        self.entries
            .encode()
            .map_err(|e| CryptoError::Encoding(e.to_string()))
    }

    /// Key identifier as bytes, if the key carries one.
    pub fn kid(&self) -> Option<&[u8]> {
        self.kid.as_deref()
    }

    /// Build an ECDSA P-256 verification key from the affine coordinates.
    pub fn verifying_key(&self) -> Result<VerifyingKey, CryptoError> {
        let mut sec1 = Vec::with_capacity(1 + 2 * COORDINATE_LEN);
        sec1.push(0x04);
        sec1.extend_from_slice(&self.x);
        sec1.extend_from_slice(&self.y);
        VerifyingKey::from_sec1_bytes(&sec1)
            .map_err(|e| CryptoError::InvalidKey(format!("point is not on P-256: {e}")))
    }
}

fn coordinate(key: &HeaderMap, label: i64, name: &str) -> Result<Vec<u8>, CryptoError> {
    match key.get(label) {
        Some(Value::Bytes(b)) if b.len() == COORDINATE_LEN => Ok(b.clone()),
        Some(Value::Bytes(b)) => Err(CryptoError::InvalidKey(format!(
            "{name} coordinate must be {COORDINATE_LEN} bytes, found {}",
            b.len()
        ))),
        Some(_) => Err(CryptoError::InvalidKey(format!(
            "{name} coordinate must be a byte string"
        ))),
        None => Err(CryptoError::InvalidKey(format!("{name} coordinate is missing"))),
    }
}
