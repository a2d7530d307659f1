// Path: crates/state/src/merkle/mod.rs
//! Generic Merkle inclusion proofs against a 32-byte root.
//!
//! This module contains the proof structures and the pure, stateless verifier
//! function. Sibling order is fixed by value: every internal node is
//! `keccak256(min(a, b) ‖ max(a, b))`, so the same tree always yields the
//! same root regardless of which leaf is being proven, and proofs carry no
//! direction bits.

use qmr_crypto::keccak256;
use qmr_types::Hash32;

#[cfg(test)]
mod tests;

/// Combines two nodes with the canonical pairwise ordering rule.
fn combine(a: &Hash32, b: &Hash32) -> Hash32 {
    let mut data = [0u8; 64];
    if a <= b {
        data[..32].copy_from_slice(a);
        data[32..].copy_from_slice(b);
    } else {
        data[..32].copy_from_slice(b);
        data[32..].copy_from_slice(a);
    }
    keccak256(data)
}

/// Checks an inclusion proof for `leaf` against `root`.
///
/// This is a predicate, not a fallible operation: a mismatched proof simply
/// returns `false`. The empty proof is valid exactly for the single-leaf
/// tree, where the leaf is the root.
pub fn verify_proof(root: &Hash32, leaf: &Hash32, proof: &[Hash32]) -> bool {
    let mut node = *leaf;
    for sibling in proof {
        node = combine(&node, sibling);
    }
    node == *root
}

/// An in-memory Merkle tree over pre-hashed leaves.
///
/// Odd nodes at any level are promoted to the next level unpaired, which
/// keeps proofs minimal and matches what [`verify_proof`] reconstructs.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    // levels[0] is the leaf level; the last level holds the single root.
    levels: Vec<Vec<Hash32>>,
}

impl MerkleTree {
    /// Builds a tree over the given leaf hashes; `None` for an empty slice.
    pub fn build(leaves: &[Hash32]) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }
        let mut levels = vec![leaves.to_vec()];
        while levels.last().map(Vec::len) != Some(1) {
            let current = levels.last().cloned().unwrap_or_default();
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                match pair {
                    [a, b] => next.push(combine(a, b)),
                    [a] => next.push(*a),
                    _ => unreachable!("chunks(2) yields 1 or 2 elements"),
                }
            }
            levels.push(next);
        }
        Some(Self { levels })
    }

    /// The root hash.
    pub fn root(&self) -> Hash32 {
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of leaves the tree was built over.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// The inclusion proof for the leaf at `index`, or `None` out of range.
    pub fn proof(&self, index: usize) -> Option<Vec<Hash32>> {
        if index >= self.leaf_count() {
            return None;
        }
        let mut proof = Vec::new();
        let mut position = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = position ^ 1;
            if sibling < level.len() {
                proof.push(level[sibling]);
            }
            position /= 2;
        }
        Some(proof)
    }
}
