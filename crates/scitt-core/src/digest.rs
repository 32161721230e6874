//! # SHA-256 Digests
//!
//! Thin helpers over `sha2`. [`sha256_digest`] accepts only
//! [`CanonicalBytes`], which is how the tree profile's expected claim digest
//! is computed; [`sha256`] is for raw MMR node material.

use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A 32-byte SHA-256 output.
pub type Digest32 = [u8; 32];

/// SHA-256 of raw bytes.
pub fn sha256(data: &[u8]) -> Digest32 {
    Sha256::digest(data).into()
}

/// SHA-256 of canonical statement bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> Digest32 {
    sha256(data.as_bytes())
}

/// Render bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_empty_known_vector() {
        assert_eq!(
            to_hex(&sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x00, 0x0f, 0xab]), "000fab");
        assert_eq!(to_hex(&[]), "");
    }
}
