// Path: crates/relay/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! The QMR relay: signing-policy rotation and weighted-threshold message
//! confirmation.
//!
//! A changing committee of weighted signers attests to one protocol message
//! per (sub-protocol, round); the relay verifies that a quorum of the current
//! signing weight approved a message and records its Merkle root exactly once
//! per key. Policies rotate per reward epoch; confirmations arriving just
//! after a rotation may still use the previous epoch's policy at an increased
//! threshold (the grace window).
//!
//! The state machine is strictly sequential: one submitted payload at a time,
//! every operation a pure, terminating computation over its inputs and the
//! current state snapshot. State is an explicit, injectable struct; there are
//! no process-wide singletons.

/// Signing-policy identity hashing and registry capture.
pub mod policy;
/// The relay state machine and its persistent state.
pub mod relay;
/// Round/epoch time arithmetic interface (consumed, not implemented here).
pub mod timing;
/// The weighted-threshold signature verifier.
pub mod verify;

pub use policy::{build_policy, policy_hash, VoterRegistry};
pub use relay::{ConfirmOutcome, Relay, RelayConfig, RelayState};
pub use timing::{FixedSchedule, RoundTiming};
pub use verify::verify_signatures;
