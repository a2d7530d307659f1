// Path: crates/crypto/src/recover/mod.rs
//! ECDSA signer recovery.
//!
//! The weighted-threshold verifier only ever needs one operation from the
//! curve: recover the signer address from `(hash, r, s, v)`. That operation
//! is modeled as the [`SignerRecovery`] capability so the verification core
//! never touches secp256k1 directly, and alternative curve backends (or test
//! doubles) can be injected.

use crate::hash::keccak256;
use qmr_types::error::CryptoError;
use qmr_types::{Address, Hash32};

#[cfg(test)]
mod tests;

/// Capability to recover a signer address from an ECDSA signature.
pub trait SignerRecovery {
    /// Recovers the address that signed `message_hash`.
    ///
    /// Fails with [`CryptoError::InvalidSignature`] on malformed recovery
    /// input; never panics.
    fn recover(
        &self,
        message_hash: &Hash32,
        r: &Hash32,
        s: &Hash32,
        v: u8,
    ) -> Result<Address, CryptoError>;
}

/// secp256k1 recovery with Ethereum-style addressing.
///
/// The recovered 64-byte public key is hashed with keccak-256 and the last
/// 20 bytes form the address. The recovery id accepts both the raw `{0, 1}`
/// form and the legacy `{27, 28}` convention.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1Recovery;

impl SignerRecovery for Secp256k1Recovery {
    fn recover(
        &self,
        message_hash: &Hash32,
        r: &Hash32,
        s: &Hash32,
        v: u8,
    ) -> Result<Address, CryptoError> {
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(r);
        compact[32..].copy_from_slice(s);
        let signature = libsecp256k1::Signature::parse_standard(&compact)
            .map_err(|e| CryptoError::InvalidSignature(format!("r/s parse: {e}")))?;
        let recovery_id = libsecp256k1::RecoveryId::parse(if v > 26 { v - 27 } else { v })
            .map_err(|_| CryptoError::InvalidSignature(format!("recovery id {v}")))?;
        let message = libsecp256k1::Message::parse(message_hash);
        let public_key = libsecp256k1::recover(&message, &signature, &recovery_id)
            .map_err(|e| CryptoError::InvalidSignature(format!("recover: {e}")))?;
        Ok(address_for_public_key(&public_key))
    }
}

/// Derives the protocol address for a secp256k1 public key.
pub fn address_for_public_key(public_key: &libsecp256k1::PublicKey) -> Address {
    // serialize() yields 65 bytes with a constant 0x04 prefix; the address
    // hashes only the 64-byte point.
    let digest = keccak256(&public_key.serialize()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    Address(address)
}
