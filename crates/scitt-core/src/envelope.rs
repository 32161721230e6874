//! # COSE_Sign1 Envelope
//!
//! A single-signer signed envelope is the CBOR tag 18 wrapped around exactly
//! four positional fields:
//!
//! ```text
//! 18([protected: bstr, unprotected: map, payload: bstr / nil, signature: bstr])
//! ```
//!
//! The protected header stays serialized; it is decoded on demand with
//! [`Envelope::decode_protected`]. Callers decode it once and pass the
//! resulting [`HeaderMap`] onward rather than re-decoding.

use ciborium::value::Value;

use crate::error::ScittError;
use crate::header::{value_kind, HeaderMap};
use crate::label::{COSE_SIGN1_TAG, RECEIPTS};

/// Location name of the protected header in error messages.
pub const PROTECTED: &str = "protected header";
/// Location name of the unprotected header in error messages.
pub const UNPROTECTED: &str = "unprotected header";

/// An owned, mutable view of a COSE_Sign1 envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Serialized protected header mapping.
    pub protected: Vec<u8>,
    /// Unprotected header mapping. Mutable after signing.
    pub unprotected: HeaderMap,
    /// Payload, `None` when detached.
    pub payload: Option<Vec<u8>>,
    /// Signature bytes.
    pub signature: Vec<u8>,
}

impl Envelope {
    /// Parse a serialized envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ScittError::MalformedEnvelope`] if the bytes are not CBOR,
    /// the tag is not 18, or the tagged item is not a four-element array of
    /// the expected field types.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ScittError> {
        let value: Value = ciborium::de::from_reader(bytes)
            .map_err(|e| ScittError::MalformedEnvelope(format!("not valid CBOR: {e}")))?;
        Self::from_value(value)
    }

    /// Interpret an already-decoded CBOR value as an envelope.
    pub fn from_value(value: Value) -> Result<Self, ScittError> {
        let (tag, inner) = match value {
            Value::Tag(tag, inner) => (tag, *inner),
            other => {
                return Err(ScittError::MalformedEnvelope(format!(
                    "expected COSE_Sign1 tag {COSE_SIGN1_TAG}, found untagged {}",
                    value_kind(&other)
                )))
            }
        };
        if tag != COSE_SIGN1_TAG {
            return Err(ScittError::MalformedEnvelope(format!(
                "expected COSE_Sign1 tag {COSE_SIGN1_TAG}, found tag {tag}"
            )));
        }

        let fields = match inner {
            Value::Array(fields) if fields.len() == 4 => fields,
            Value::Array(fields) => {
                return Err(ScittError::MalformedEnvelope(format!(
                    "expected 4 fields, found {}",
                    fields.len()
                )))
            }
            other => {
                return Err(ScittError::MalformedEnvelope(format!(
                    "expected array, found {}",
                    value_kind(&other)
                )))
            }
        };

        let mut fields = fields.into_iter();
        let protected = match fields.next() {
            Some(Value::Bytes(b)) => b,
            _ => return Err(field_error("protected header", "byte string")),
        };
        let unprotected = match fields.next() {
            Some(Value::Map(entries)) => HeaderMap::from_entries(entries, UNPROTECTED),
            _ => return Err(field_error("unprotected header", "map")),
        };
        let payload = match fields.next() {
            Some(Value::Bytes(b)) => Some(b),
            Some(Value::Null) => None,
            _ => return Err(field_error("payload", "byte string or nil")),
        };
        let signature = match fields.next() {
            Some(Value::Bytes(b)) => b,
            _ => return Err(field_error("signature", "byte string")),
        };

        Ok(Self {
            protected,
            unprotected,
            payload,
            signature,
        })
    }

    /// Build the tagged CBOR value for this envelope.
    pub fn to_value(&self) -> Value {
        Value::Tag(
            COSE_SIGN1_TAG,
            Box::new(Value::Array(vec![
                Value::Bytes(self.protected.clone()),
                self.unprotected.to_value(),
                match &self.payload {
                    Some(p) => Value::Bytes(p.clone()),
                    None => Value::Null,
                },
                Value::Bytes(self.signature.clone()),
            ])),
        )
    }

    /// Serialize the envelope.
    pub fn to_vec(&self) -> Result<Vec<u8>, ScittError> {
        let mut out = Vec::new();
        ciborium::ser::into_writer(&self.to_value(), &mut out)
            .map_err(|e| ScittError::Encoding(e.to_string()))?;
        Ok(out)
    }

    /// Decode the protected header bytes into a mapping.
    ///
    /// Not cached: decode once and pass the mapping along.
    pub fn decode_protected(&self) -> Result<HeaderMap, ScittError> {
        HeaderMap::decode(&self.protected, PROTECTED)
    }

    /// The serialized receipts stapled under the receipts-array label, in
    /// array order. An absent label means no receipts.
    pub fn receipts(&self) -> Result<Vec<&[u8]>, ScittError> {
        if !self.unprotected.contains(RECEIPTS) {
            return Ok(Vec::new());
        }
        self.unprotected
            .require_array(RECEIPTS)?
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Bytes(b) => Ok(b.as_slice()),
                other => Err(ScittError::MalformedEnvelope(format!(
                    "receipt {i} must be a serialized envelope (byte string), found {}",
                    value_kind(other)
                ))),
            })
            .collect()
    }
}

fn field_error(field: &str, expected: &str) -> ScittError {
    ScittError::MalformedEnvelope(format!("{field} must be a {expected}"))
}
