//! A receipt decoded once for dispatch: the raw bytes (handed to external
//! collaborators unchanged), the envelope, and its protected header.

use ciborium::value::Value;

use scitt_core::label::{CLAIM_ISS, CLAIM_SUB, CWT_CLAIMS};
use scitt_core::{to_hex, Envelope, HeaderMap, ScittError};

use crate::profile::Profile;

/// Location name of a CWT claims bag in error messages.
pub const CLAIMS: &str = "CWT claims";

/// A receipt with its protected header decoded.
#[derive(Debug, Clone)]
pub struct DecodedReceipt<'a> {
    bytes: &'a [u8],
    /// The parsed envelope.
    pub envelope: Envelope,
    /// The decoded protected header.
    pub protected: HeaderMap,
}

impl<'a> DecodedReceipt<'a> {
    /// Parse a serialized receipt and decode its protected header.
    pub fn decode(bytes: &'a [u8]) -> Result<Self, ScittError> {
        let envelope = Envelope::from_slice(bytes)?;
        let protected = envelope.decode_protected()?;
        Ok(Self {
            bytes,
            envelope,
            protected,
        })
    }

    /// The receipt exactly as stapled.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Profile selected by the receipt.
    pub fn profile(&self) -> Result<Profile, ScittError> {
        Profile::from_protected(&self.protected)
    }

    /// The CWT claims bag of the protected header.
    pub fn claims(&self) -> Result<HeaderMap, ScittError> {
        self.protected.require_map(CWT_CLAIMS, CLAIMS)
    }
}

/// Issuer and subject claims, rendered for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Claim 1.
    pub issuer: Option<String>,
    /// Claim 2.
    pub subject: Option<String>,
}

impl Identity {
    /// Read issuer and subject from a claims bag. Either may be absent.
    pub fn from_claims(claims: &HeaderMap) -> Self {
        Self {
            issuer: claims.get(CLAIM_ISS).and_then(render),
            subject: claims.get(CLAIM_SUB).and_then(render),
        }
    }
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Integer(i) => Some(i128::from(*i).to_string()),
        Value::Bytes(b) => Some(to_hex(b)),
        _ => None,
    }
}
