// Path: crates/crypto/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! Cryptographic primitives for the QMR protocol.
//!
//! Two concerns live here: the canonical hash function (keccak-256, the hash
//! every policy identity and message digest in the protocol is built from)
//! and ECDSA signer recovery. Recovery is exposed as a capability trait so
//! the verification core stays decoupled from the curve implementation.

/// Hash functions behind the [`hash::HashFunction`] trait.
pub mod hash;
/// ECDSA signer recovery behind the [`recover::SignerRecovery`] capability.
pub mod recover;

pub use hash::keccak256;
pub use recover::{Secp256k1Recovery, SignerRecovery};
