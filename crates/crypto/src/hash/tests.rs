//! Tests for hash function implementations.

use super::{keccak256, HashFunction, Keccak256Hash};

#[test]
fn keccak256_known_vectors() {
    // keccak-256 of the empty string and of "abc", from the reference vectors
    assert_eq!(
        hex::encode(keccak256([])),
        "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
    );
    assert_eq!(
        hex::encode(keccak256(b"abc")),
        "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
    );
}

#[test]
fn trait_and_convenience_agree() {
    let message = b"test message";
    let hasher = Keccak256Hash;
    assert_eq!(hasher.hash(message), keccak256(message).to_vec());
    assert_eq!(hasher.hash(message).len(), hasher.digest_size());
    assert_eq!(hasher.digest_size(), 32);
    assert_eq!(hasher.name(), "Keccak-256");
    // Deterministic behavior
    assert_eq!(hasher.hash(message), hasher.hash(message));
}
