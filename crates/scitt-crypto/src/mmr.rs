//! # Merkle Mountain Range (MMR) Inclusion Proofs
//!
//! Verification side of the MMR receipt profile. The log is a sequence of
//! nodes addressed by a zero-based index; leaves and interior nodes share
//! the same index space and a node's height is derived from its index.
//!
//! ## Algorithm
//!
//! Positions are one-based (`pos = index + 1`). Interior nodes are hashed
//! with the parent's position as a domain separator:
//!
//! ```text
//! node = SHA256(be_u64(parent_pos) || left || right)
//! ```
//!
//! Binding the position prevents a subtree from being replayed at a
//! different place in another tree shape.
//!
//! Applying a proof walks from the leaf towards its peak. At each step the
//! height of the *next* index tells whether the current node is a right
//! child (the next index is its parent) or a left child (the parent is
//! `2^(g+1)` entries further on). The result is the peak committing to the
//! leaf; the receipt signs over that value.
//!
//! Heights for indices 0, 1, 2, ... are 0, 0, 1, 0, 0, 1, 2, 0, 0, 1, ...

use sha2::{Digest, Sha256};

use scitt_core::Digest32;

use crate::error::CryptoError;

/// Number of significant bits in `pos`.
fn bit_length(pos: u64) -> u32 {
    u64::BITS - pos.leading_zeros()
}

/// True iff every bit of `pos` from the most significant set bit down is 1
/// (`pos == 2^k - 1`).
pub fn is_all_ones(pos: u64) -> bool {
    pos & pos.wrapping_add(1) == 0
}

/// The power of two equal to the highest set bit of `pos`, or 0 for 0.
pub fn most_sig_bit(pos: u64) -> u64 {
    if pos == 0 {
        0
    } else {
        1 << (bit_length(pos) - 1)
    }
}

/// Zero-based height of the node at `index`.
///
/// Strips the left-most perfect subtrees from the position until what is
/// left is itself a perfect tree's size; its bit length is then the height.
pub fn index_height(index: u64) -> u32 {
    let mut pos = index.saturating_add(1);
    while !is_all_ones(pos) {
        pos -= most_sig_bit(pos) - 1;
    }
    bit_length(pos) - 1
}

/// `SHA256(be_u64(pos) || left || right)`.
///
/// `pos` is the one-based position of the parent node. Argument order
/// matters.
pub fn hash_pos_pair(pos: u64, left: &[u8], right: &[u8]) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(pos.to_be_bytes());
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Apply an inclusion proof to the node at `index` and return the implied
/// root (the peak that commits to the node).
///
/// `proof` is ordered from the leaf upward. An empty proof returns `node`
/// unchanged: a peak proves itself.
///
/// # Errors
///
/// Returns [`CryptoError::Mmr`] if the proof walks the index past `u64`
/// range, which no genuine proof can do.
pub fn included_root(index: u64, node: &Digest32, proof: &[Digest32]) -> Result<Digest32, CryptoError> {
    let mut root = *node;
    let mut i = index;
    let mut g = index_height(i);

    for (step, sibling) in proof.iter().enumerate() {
        let overflow = || CryptoError::Mmr(format!("index overflow at proof step {step}"));
        let next = i.checked_add(1).ok_or_else(overflow)?;

        if index_height(next) > g {
            // Right child: the parent immediately follows.
            i = next;
            let parent_pos = i.checked_add(1).ok_or_else(overflow)?;
            root = hash_pos_pair(parent_pos, sibling, &root);
        } else {
            // Left child: the parent follows the right sibling's subtree.
            let span = 1u64.checked_shl(g + 1).ok_or_else(overflow)?;
            i = i.checked_add(span).ok_or_else(overflow)?;
            let parent_pos = i.checked_add(1).ok_or_else(overflow)?;
            root = hash_pos_pair(parent_pos, &root, sibling);
        }
        g += 1;
    }

    Ok(root)
}
