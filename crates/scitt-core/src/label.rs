//! # Header Labels: Wire Constants
//!
//! Integer labels assigned by the COSE, CWT, SCITT and COSE-receipts
//! registries. These are a wire-compatibility contract: receipts produced
//! by existing transparency services use exactly these values.

/// CBOR tag identifying a single-signer COSE_Sign1 envelope.
pub const COSE_SIGN1_TAG: u64 = 18;

// ---------------------------------------------------------------------------
// COSE header parameters
// ---------------------------------------------------------------------------

/// Signature algorithm (protected header).
pub const ALG: i64 = 1;

/// CWT claims bag (protected header).
pub const CWT_CLAIMS: i64 = 15;

/// Receipts stapled to a transparent statement (unprotected header).
pub const RECEIPTS: i64 = 394;

/// Verifiable data structure, i.e. the receipt profile id (protected header).
pub const VDS: i64 = 395;

/// Verifiable data structure proofs (unprotected header).
pub const VDP: i64 = 396;

/// Inclusion proofs entry inside the VDP map.
pub const INCLUSION_PROOFS: i64 = -1;

/// MMR leaf digest committed by the log (receipt unprotected header).
pub const MMR_LEAF_DIGEST: i64 = -259;

/// MMR leaf timestamp, milliseconds as an unsigned integer (receipt unprotected header).
pub const MMR_LEAF_TIMESTAMP: i64 = -260;

// ---------------------------------------------------------------------------
// CWT claims
// ---------------------------------------------------------------------------

/// Issuer claim.
pub const CLAIM_ISS: i64 = 1;

/// Subject claim.
pub const CLAIM_SUB: i64 = 2;

/// Confirmation claim.
pub const CLAIM_CNF: i64 = 8;

/// COSE_Key entry inside the confirmation claim.
pub const CNF_COSE_KEY: i64 = 1;

// ---------------------------------------------------------------------------
// COSE_Key parameters
// ---------------------------------------------------------------------------

/// Key type.
pub const KEY_KTY: i64 = 1;
/// Key identifier.
pub const KEY_KID: i64 = 2;
/// EC2 curve.
pub const KEY_CRV: i64 = -1;
/// EC2 x coordinate.
pub const KEY_X: i64 = -2;
/// EC2 y coordinate.
pub const KEY_Y: i64 = -3;

/// `kty` value for EC2 keys.
pub const KTY_EC2: i64 = 2;
/// `crv` value for NIST P-256.
pub const CRV_P256: i64 = 1;
/// `alg` value for ECDSA with SHA-256.
pub const ALG_ES256: i64 = -7;

// ---------------------------------------------------------------------------
// Receipt profiles (values under `VDS`)
// ---------------------------------------------------------------------------

/// CCF binary Merkle tree profile.
pub const PROFILE_TREE: i64 = 2;

/// Merkle Mountain Range profile.
pub const PROFILE_MMR: i64 = 3;
