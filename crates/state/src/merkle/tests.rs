//! Tests for Merkle tree construction and proof verification.

use super::{verify_proof, MerkleTree};
use qmr_crypto::keccak256;
use qmr_types::Hash32;
use proptest::prelude::*;

fn leaves(n: usize) -> Vec<Hash32> {
    (0..n).map(|i| keccak256(format!("leaf-{i}"))).collect()
}

#[test]
fn empty_input_builds_no_tree() {
    assert!(MerkleTree::build(&[]).is_none());
}

#[test]
fn single_leaf_tree_has_empty_proof() {
    let leaf = keccak256(b"only");
    let tree = MerkleTree::build(&[leaf]).unwrap();
    assert_eq!(tree.root(), leaf);
    assert_eq!(tree.proof(0).unwrap(), Vec::<Hash32>::new());
    assert!(verify_proof(&tree.root(), &leaf, &[]));
}

#[test]
fn empty_proof_only_valid_when_leaf_is_root() {
    let leaf = keccak256(b"a");
    let other = keccak256(b"b");
    assert!(verify_proof(&leaf, &leaf, &[]));
    assert!(!verify_proof(&other, &leaf, &[]));
}

#[test]
fn every_leaf_proves_for_assorted_sizes() {
    for n in 1..=9 {
        let leaves = leaves(n);
        let tree = MerkleTree::build(&leaves).unwrap();
        for (i, leaf) in leaves.iter().enumerate() {
            let proof = tree.proof(i).unwrap();
            assert!(
                verify_proof(&tree.root(), leaf, &proof),
                "leaf {i} of {n} must verify"
            );
        }
    }
}

#[test]
fn proof_index_out_of_range_is_none() {
    let tree = MerkleTree::build(&leaves(4)).unwrap();
    assert!(tree.proof(4).is_none());
}

#[test]
fn flipping_any_proof_bit_invalidates() {
    let leaves = leaves(8);
    let tree = MerkleTree::build(&leaves).unwrap();
    let proof = tree.proof(3).unwrap();
    assert_eq!(proof.len(), 3);
    for element in 0..proof.len() {
        for bit in [0usize, 77, 255] {
            let mut corrupted = proof.clone();
            corrupted[element][bit / 8] ^= 1 << (bit % 8);
            assert!(
                !verify_proof(&tree.root(), &leaves[3], &corrupted),
                "corrupting element {element} bit {bit} must fail"
            );
        }
    }
}

#[test]
fn wrong_leaf_does_not_verify() {
    let leaves = leaves(5);
    let tree = MerkleTree::build(&leaves).unwrap();
    let proof = tree.proof(2).unwrap();
    assert!(!verify_proof(&tree.root(), &leaves[1], &proof));
}

proptest! {
    #[test]
    fn prop_every_leaf_of_random_tree_proves(
        seed_bytes in proptest::collection::vec(any::<[u8; 16]>(), 1..40),
    ) {
        let leaves: Vec<Hash32> = seed_bytes.iter().map(keccak256).collect();
        let tree = MerkleTree::build(&leaves).unwrap();
        for (i, leaf) in leaves.iter().enumerate() {
            let proof = tree.proof(i).unwrap();
            prop_assert!(verify_proof(&tree.root(), leaf, &proof));
        }
    }
}
