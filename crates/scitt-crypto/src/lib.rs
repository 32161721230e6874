//! # scitt-crypto — Cryptographic Primitives for Receipt Verification
//!
//! - **Merkle Mountain Range (MMR)** position arithmetic, the
//!   position-domain-separated node hash, and inclusion-proof application
//!   ([`mmr::included_root`]).
//! - **Confirmation keys**: normalization of the `cnf` COSE_Key carried in
//!   an MMR receipt into strict EC2 / P-256 form ([`ConfirmationKey`]).
//! - **COSE_Sign1 verification** of a receipt's signature over a detached
//!   payload with ES256 ([`sign1::verify_detached`]).
//!
//! ## Crate Policy
//!
//! - Depends only on `scitt-core` internally.
//! - No mocking of cryptographic operations in tests: real SHA-256, real
//!   ECDSA P-256.

pub mod cose_key;
pub mod error;
pub mod mmr;
pub mod sign1;

pub use cose_key::ConfirmationKey;
pub use error::CryptoError;
pub use mmr::{hash_pos_pair, included_root, index_height};
pub use sign1::verify_detached;
