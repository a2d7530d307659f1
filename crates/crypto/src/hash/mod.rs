// Path: crates/crypto/src/hash/mod.rs
//! Cryptographic hash functions.

use qmr_types::Hash32;
use sha3::{Digest, Keccak256};

#[cfg(test)]
mod tests;

/// Hash function trait.
pub trait HashFunction {
    /// Hash a message and return the digest.
    fn hash(&self, message: &[u8]) -> Vec<u8>;

    /// Get the digest size in bytes.
    fn digest_size(&self) -> usize;

    /// Get the name of the hash function.
    fn name(&self) -> &str;
}

/// Keccak-256, the canonical hash of the QMR protocol.
///
/// Policy identity hashes, message digests, signer addresses and Merkle node
/// combination all use this function; it is frozen together with the wire
/// codec.
#[derive(Default, Clone)]
pub struct Keccak256Hash;

impl HashFunction for Keccak256Hash {
    fn hash(&self, message: &[u8]) -> Vec<u8> {
        Keccak256::digest(message).to_vec()
    }

    fn digest_size(&self) -> usize {
        32
    }

    fn name(&self) -> &str {
        "Keccak-256"
    }
}

/// Create a keccak-256 hash of any type that can be referenced as bytes.
pub fn keccak256<T: AsRef<[u8]>>(data: T) -> Hash32 {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data.as_ref()));
    out
}
