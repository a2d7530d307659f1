// Path: crates/state/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! Merkle commitment verification for the QMR protocol.
//!
//! The relay confirms one Merkle root per (protocol, round); this crate
//! provides the stateless inclusion-proof verifier used to check individual
//! attestation leaves against such a root, plus the tree builder that
//! attestation producers use to construct roots and proofs that the verifier
//! accepts.

/// The sorted-pair keccak Merkle tree and its proof verifier.
pub mod merkle;

pub use merkle::{verify_proof, MerkleTree};
