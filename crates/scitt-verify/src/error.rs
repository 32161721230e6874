//! Verification errors with receipt context.

use scitt_core::ScittError;
use thiserror::Error;

use crate::profile::Profile;

/// Why a statement failed verification.
#[derive(Error, Debug)]
pub enum VerificationError {
    /// The statement itself could not be decoded or canonicalized.
    #[error("statement: {0}")]
    Statement(#[source] ScittError),

    /// A stapled receipt failed. `profile` is `None` when the failure
    /// happened before a profile was selected.
    #[error("receipt {index}{}: {source}", profile_suffix(.profile))]
    Receipt {
        /// Position in the receipts array.
        index: usize,
        /// Profile the receipt selected, if known.
        profile: Option<Profile>,
        /// The underlying failure.
        #[source]
        source: ScittError,
    },
}

impl VerificationError {
    pub(crate) fn receipt(index: usize, profile: Option<Profile>, source: ScittError) -> Self {
        Self::Receipt {
            index,
            profile,
            source,
        }
    }

    /// The underlying error kind.
    pub fn kind(&self) -> &ScittError {
        match self {
            Self::Statement(e) => e,
            Self::Receipt { source, .. } => source,
        }
    }

    /// Index of the failing receipt, if the failure was receipt-specific.
    pub fn receipt_index(&self) -> Option<usize> {
        match self {
            Self::Statement(_) => None,
            Self::Receipt { index, .. } => Some(*index),
        }
    }
}

fn profile_suffix(profile: &Option<Profile>) -> String {
    match profile {
        Some(p) => format!(" [{p}]"),
        None => String::new(),
    }
}
