//! # Receipt Composer
//!
//! Staples serialized receipts into a statement's unprotected header under
//! the receipts-array label. Append-only and order-preserving; stapling the
//! same receipt twice yields two entries.

use ciborium::value::Value;

use crate::envelope::{Envelope, UNPROTECTED};
use crate::error::ScittError;
use crate::label::RECEIPTS;

/// Append `receipt` to the statement's receipts array, creating the array if
/// the label is absent.
///
/// The receipt must itself parse as a COSE_Sign1 envelope; it is stored as
/// the exact bytes given.
///
/// # Errors
///
/// - [`ScittError::MalformedEnvelope`] if `receipt` is not an envelope.
/// - [`ScittError::TypeMismatch`] if the statement already carries a
///   receipts label that is not an array.
pub fn staple(mut statement: Envelope, receipt: Vec<u8>) -> Result<Envelope, ScittError> {
    Envelope::from_slice(&receipt)?;

    match statement.unprotected.get_mut(RECEIPTS) {
        Some(Value::Array(receipts)) => receipts.push(Value::Bytes(receipt)),
        Some(_) => {
            return Err(ScittError::TypeMismatch {
                label: RECEIPTS,
                location: UNPROTECTED,
                expected: "array",
            })
        }
        None => statement
            .unprotected
            .insert(RECEIPTS, Value::Array(vec![Value::Bytes(receipt)])),
    }
    Ok(statement)
}
