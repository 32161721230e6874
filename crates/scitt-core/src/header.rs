//! # Header Maps: Label-Indexed CBOR Mappings
//!
//! COSE header values are dynamically typed: depending on the label a value
//! may be an integer, a byte string, text, a nested mapping, or a sequence.
//! `HeaderMap` keeps the decoded entries in wire order and exposes typed
//! accessors that fail with [`ScittError::MissingLabel`] or
//! [`ScittError::TypeMismatch`] instead of trusting the shape of the input.
//!
//! Each map remembers a `location` name so errors say where a label was
//! expected ("protected header", "claims", "COSE_Key", ...).

use ciborium::value::{Integer, Value};

use crate::error::ScittError;

/// A decoded CBOR mapping keyed by integer labels.
///
/// Entry order is preserved exactly as decoded so that re-serialization
/// produces the same bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMap {
    entries: Vec<(Value, Value)>,
    location: &'static str,
}

impl HeaderMap {
    /// Create an empty mapping.
    pub fn new(location: &'static str) -> Self {
        Self {
            entries: Vec::new(),
            location,
        }
    }

    /// Wrap already-decoded map entries.
    pub fn from_entries(entries: Vec<(Value, Value)>, location: &'static str) -> Self {
        Self { entries, location }
    }

    /// Interpret a CBOR value as a mapping.
    pub fn from_value(value: Value, location: &'static str) -> Result<Self, ScittError> {
        match value {
            Value::Map(entries) => Ok(Self { entries, location }),
            other => Err(ScittError::MalformedEnvelope(format!(
                "{location} must be a map, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Decode serialized mapping bytes.
    ///
    /// A zero-length byte string is the COSE encoding of an empty protected
    /// header and yields an empty map.
    pub fn decode(bytes: &[u8], location: &'static str) -> Result<Self, ScittError> {
        if bytes.is_empty() {
            return Ok(Self::new(location));
        }
        let value: Value = ciborium::de::from_reader(bytes).map_err(|e| {
            ScittError::MalformedEnvelope(format!("{location} is not valid CBOR: {e}"))
        })?;
        Self::from_value(value, location)
    }

    /// Serialize the mapping to CBOR bytes.
    pub fn encode(&self) -> Result<Vec<u8>, ScittError> {
        let mut out = Vec::new();
        ciborium::ser::into_writer(&Value::Map(self.entries.clone()), &mut out)
            .map_err(|e| ScittError::Encoding(e.to_string()))?;
        Ok(out)
    }

    /// Where this mapping lives, used in error messages.
    pub fn location(&self) -> &'static str {
        self.location
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over raw entries in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }

    /// Consume the mapping into a CBOR value.
    pub fn into_value(self) -> Value {
        Value::Map(self.entries)
    }

    /// Clone the mapping into a CBOR value.
    pub fn to_value(&self) -> Value {
        Value::Map(self.entries.clone())
    }

    /// Look up a label.
    pub fn get(&self, label: i64) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| is_label(k, label))
            .map(|(_, v)| v)
    }

    /// Look up a label for in-place mutation.
    pub fn get_mut(&mut self, label: i64) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| is_label(k, label))
            .map(|(_, v)| v)
    }

    /// Returns true if the label is present.
    pub fn contains(&self, label: i64) -> bool {
        self.get(label).is_some()
    }

    /// Set a label, replacing an existing value in place or appending a new entry.
    pub fn insert(&mut self, label: i64, value: Value) {
        match self.get_mut(label) {
            Some(slot) => *slot = value,
            None => self.entries.push((Value::Integer(Integer::from(label)), value)),
        }
    }

    /// Look up a label that must be present.
    pub fn require(&self, label: i64) -> Result<&Value, ScittError> {
        self.get(label).ok_or(ScittError::MissingLabel {
            label,
            location: self.location,
        })
    }

    /// Look up a label that must hold an integer representable as `i64`.
    pub fn require_int(&self, label: i64) -> Result<i64, ScittError> {
        match self.require(label)? {
            Value::Integer(i) => i64::try_from(*i).map_err(|_| self.mismatch(label, "i64 integer")),
            _ => Err(self.mismatch(label, "integer")),
        }
    }

    /// Look up a label that must hold a byte string.
    pub fn require_bytes(&self, label: i64) -> Result<&[u8], ScittError> {
        match self.require(label)? {
            Value::Bytes(b) => Ok(b),
            _ => Err(self.mismatch(label, "byte string")),
        }
    }

    /// Look up a label that must hold text.
    pub fn require_text(&self, label: i64) -> Result<&str, ScittError> {
        match self.require(label)? {
            Value::Text(s) => Ok(s),
            _ => Err(self.mismatch(label, "text string")),
        }
    }

    /// Look up a label that must hold a sequence.
    pub fn require_array(&self, label: i64) -> Result<&[Value], ScittError> {
        match self.require(label)? {
            Value::Array(items) => Ok(items),
            _ => Err(self.mismatch(label, "array")),
        }
    }

    /// Look up a label that must hold a nested mapping.
    ///
    /// A byte string holding a serialized mapping is decoded transparently,
    /// since some producers wrap nested structures in `bstr .cbor`.
    pub fn require_map(&self, label: i64, location: &'static str) -> Result<HeaderMap, ScittError> {
        match self.require(label)? {
            Value::Map(entries) => Ok(HeaderMap::from_entries(entries.clone(), location)),
            Value::Bytes(b) => HeaderMap::decode(b, location),
            _ => Err(self.mismatch(label, "map")),
        }
    }

    fn mismatch(&self, label: i64, expected: &'static str) -> ScittError {
        ScittError::TypeMismatch {
            label,
            location: self.location,
            expected,
        }
    }
}

fn is_label(key: &Value, label: i64) -> bool {
    matches!(key, Value::Integer(i) if i128::from(*i) == i128::from(label))
}

/// Short name of a CBOR value's major type, for diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Integer(_) => "integer",
        Value::Bytes(_) => "byte string",
        Value::Float(_) => "float",
        Value::Text(_) => "text string",
        Value::Bool(_) => "bool",
        Value::Null => "null",
        Value::Tag(..) => "tag",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        _ => "unknown",
    }
}
