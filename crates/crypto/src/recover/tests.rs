//! Tests for ECDSA signer recovery.

use super::{address_for_public_key, Secp256k1Recovery, SignerRecovery};
use crate::hash::keccak256;
use qmr_types::error::CryptoError;

fn keypair() -> (libsecp256k1::SecretKey, libsecp256k1::PublicKey) {
    let secret = libsecp256k1::SecretKey::random(&mut rand::thread_rng());
    let public = libsecp256k1::PublicKey::from_secret_key(&secret);
    (secret, public)
}

#[test]
fn recovers_the_signing_address() {
    let (secret, public) = keypair();
    let expected = address_for_public_key(&public);
    let hash = keccak256(b"attestation payload");

    let (signature, recovery_id) = libsecp256k1::sign(&libsecp256k1::Message::parse(&hash), &secret);
    let compact = signature.serialize();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);

    let recovered = Secp256k1Recovery.recover(&hash, &r, &s, recovery_id.serialize()).unwrap();
    assert_eq!(recovered, expected);

    // The Ethereum 27/28 convention resolves to the same signer.
    let legacy = Secp256k1Recovery.recover(&hash, &r, &s, recovery_id.serialize() + 27).unwrap();
    assert_eq!(legacy, expected);
}

#[test]
fn wrong_hash_recovers_a_different_address() {
    let (secret, public) = keypair();
    let hash = keccak256(b"signed message");
    let (signature, recovery_id) = libsecp256k1::sign(&libsecp256k1::Message::parse(&hash), &secret);
    let compact = signature.serialize();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);

    let other_hash = keccak256(b"some other message");
    let recovered = Secp256k1Recovery.recover(&other_hash, &r, &s, recovery_id.serialize()).unwrap();
    assert_ne!(recovered, address_for_public_key(&public));
}

#[test]
fn malformed_recovery_id_is_rejected() {
    let hash = keccak256(b"x");
    let err = Secp256k1Recovery.recover(&hash, &[1u8; 32], &[2u8; 32], 9).unwrap_err();
    assert!(matches!(err, CryptoError::InvalidSignature(_)));
}

#[test]
fn zero_signature_is_rejected() {
    let hash = keccak256(b"x");
    assert!(Secp256k1Recovery.recover(&hash, &[0u8; 32], &[0u8; 32], 0).is_err());
}
