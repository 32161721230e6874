//! # scitt-core — Envelope Model for Transparency Receipts
//!
//! This crate is the leaf of the workspace DAG. It defines the typed view
//! over COSE_Sign1 envelopes that every other crate operates on:
//!
//! 1. **`Envelope`**: the four positional fields of a tag-18 signed
//!    envelope, decoded once and owned by the caller.
//! 2. **`HeaderMap`**: label-indexed header mapping with fallible,
//!    typed accessors. No unchecked indexing into dynamically typed
//!    CBOR values.
//! 3. **`CanonicalBytes`**: the only way to obtain the bytes a statement
//!    signer hashed: the envelope re-serialized with an empty unprotected
//!    header. Receipt leaf digests and tree-profile claim digests accept
//!    nothing else.
//! 4. **`staple()`**: order-preserving, append-only receipt composition.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `scitt-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Header label values are wire constants (see [`label`]) and must never
//!   be renumbered.

pub mod canonical;
pub mod compose;
pub mod digest;
pub mod envelope;
pub mod error;
pub mod header;
pub mod label;

// Re-export primary types for ergonomic imports.
pub use canonical::{canonicalize, CanonicalBytes};
pub use compose::staple;
pub use digest::{sha256, sha256_digest, to_hex, Digest32};
pub use envelope::Envelope;
pub use error::ScittError;
pub use header::HeaderMap;

/// Re-export of the CBOR value type used for header values.
pub use ciborium::value::Value;
