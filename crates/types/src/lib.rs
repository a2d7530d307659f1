// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # QMR Protocol Types
//!
//! This crate is the foundational library for the QMR (quorum message relay)
//! protocol, containing the four wire structures, their fixed-layout binary
//! codec, and the unified error enums.
//!
//! ## Architectural Role
//!
//! As the base crate, `qmr-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. This structure prevents
//! circular dependencies and provides a single canonical definition for the
//! protocol ABI: any client that wants to confirm a message or install a
//! signing policy must byte-match the encodings defined here exactly,
//! including field order and width.

/// The maximum number of voters a signing policy may carry (count field is u16).
pub const MAX_VOTERS: usize = u16::MAX as usize;
/// The maximum value of a reward epoch id on the wire (encoded as u24).
pub const MAX_REWARD_EPOCH_ID: u32 = (1 << 24) - 1;

/// A 32-byte hash digest (keccak-256 everywhere in this protocol).
pub type Hash32 = [u8; 32];

/// The fixed-layout binary codec for all wire structures.
pub mod codec;
/// A unified set of all error types used across the workspace.
pub mod error;
/// The four wire structures and the `Address` newtype.
pub mod wire;

pub use wire::{Address, IndexedSignature, PayloadMessage, ProtocolMessage, SigningPolicy};
