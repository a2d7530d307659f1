// Path: crates/types/src/wire.rs
//! The four wire structures of the QMR protocol.
//!
//! These are the protocol's ABI. Their binary layouts live in [`crate::codec`]
//! and are frozen together with the policy hash: changing either changes the
//! meaning of every signature in the system.

use crate::error::PolicyError;
use crate::{Hash32, MAX_REWARD_EPOCH_ID, MAX_VOTERS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 20-byte signer address (keccak-256 of the public key, last 20 bytes).
///
/// The canonical textual form is lowercase hex; [`Address::from_hex`]
/// normalizes casing so mixed-case renderings of the same address can never
/// produce different policy hashes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Parses an address from hex, with or without a `0x` prefix, accepting
    /// any casing.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let stripped = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(stripped, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The rotating committee descriptor for one reward epoch.
///
/// Once installed for an epoch the policy is immutable; voters are stored in
/// the canonical registration order (ascending normalized weight) and the two
/// parallel sequences always have equal length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningPolicy {
    /// The reward epoch this policy is authoritative for (u24 on the wire).
    pub reward_epoch_id: u32,
    /// The first round for which this policy governs confirmations.
    pub starting_round_id: u32,
    /// Absolute normalized-weight units required for quorum.
    pub threshold: u16,
    /// Randomness seed for the epoch.
    pub seed: Hash32,
    /// Committee member addresses, index-aligned with `weights`.
    pub voters: Vec<Address>,
    /// Normalized voter weights; the sum never exceeds 65535.
    pub weights: Vec<u16>,
}

impl SigningPolicy {
    /// Builds a policy, validating every model invariant.
    pub fn new(
        reward_epoch_id: u32,
        starting_round_id: u32,
        threshold: u16,
        seed: Hash32,
        voters: Vec<Address>,
        weights: Vec<u16>,
    ) -> Result<Self, PolicyError> {
        let policy = Self { reward_epoch_id, starting_round_id, threshold, seed, voters, weights };
        policy.validate()?;
        Ok(policy)
    }

    /// Checks the model invariants on an already-constructed policy.
    ///
    /// Decoded policies are structurally valid by construction of the codec
    /// but may still violate the weight-sum ceiling; the relay validates
    /// every policy it installs.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.voters.len() != self.weights.len() {
            return Err(PolicyError::LengthMismatch {
                voters: self.voters.len(),
                weights: self.weights.len(),
            });
        }
        if self.voters.len() > MAX_VOTERS {
            return Err(PolicyError::TooManyVoters(self.voters.len()));
        }
        if self.reward_epoch_id > MAX_REWARD_EPOCH_ID {
            return Err(PolicyError::EpochOutOfRange(self.reward_epoch_id));
        }
        let total: u64 = self.weights.iter().map(|w| u64::from(*w)).sum();
        if total > u64::from(u16::MAX) {
            return Err(PolicyError::WeightOverflow(total));
        }
        Ok(())
    }

    /// The sum of all voter weights.
    pub fn total_weight(&self) -> u32 {
        self.weights.iter().map(|w| u32::from(*w)).sum()
    }
}

/// One per-(protocol, round) attestation payload.
///
/// Ephemeral: constructed only to be hashed, signed and verified. The relay
/// persists nothing of it beyond the confirmed Merkle root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolMessage {
    /// The sub-protocol producing this attestation.
    pub protocol_id: u8,
    /// The voting round the attestation belongs to.
    pub round_id: u32,
    /// Whether the round's randomness is considered secure.
    pub random_quality: bool,
    /// Root of the Merkle tree over the round's attestation leaves.
    pub merkle_root: Hash32,
}

/// One ECDSA signature over a message hash, identified by the signer's
/// position in the signing policy rather than by address.
///
/// A signature list for one message must carry strictly increasing
/// `signer_index` values; the verifier rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedSignature {
    /// Position into the policy's `voters`/`weights` sequences.
    pub signer_index: u16,
    /// ECDSA `r` component.
    pub r: Hash32,
    /// ECDSA `s` component.
    pub s: Hash32,
    /// ECDSA recovery id; 0/1 and the Ethereum 27/28 convention are accepted.
    pub v: u8,
}

/// Generic envelope multiplexing sub-protocol payloads inside one submission.
///
/// The payload bytes are opaque to the envelope; their structure is defined
/// by `protocol_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadMessage {
    /// The sub-protocol the payload belongs to.
    pub protocol_id: u8,
    /// The voting round the payload refers to.
    pub round_id: u32,
    /// Opaque sub-protocol bytes (u16 length on the wire).
    pub payload: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_hex_normalizes_casing() {
        let lower = Address::from_hex("0x52908400098527886e0f7030069857d2e4169ee7").unwrap();
        let mixed = Address::from_hex("0x52908400098527886E0F7030069857D2E4169EE7").unwrap();
        assert_eq!(lower, mixed);
        assert_eq!(lower.to_string(), "0x52908400098527886e0f7030069857d2e4169ee7");
    }

    #[test]
    fn address_hex_rejects_bad_input() {
        assert!(Address::from_hex("0x1234").is_err());
        assert!(Address::from_hex("zz08400098527886e0f7030069857d2e4169ee7a").is_err());
    }

    #[test]
    fn policy_rejects_length_mismatch() {
        let err = SigningPolicy::new(1, 10, 100, [0u8; 32], vec![Address([1u8; 20])], vec![])
            .unwrap_err();
        assert_eq!(err, PolicyError::LengthMismatch { voters: 1, weights: 0 });
    }

    #[test]
    fn policy_rejects_weight_overflow() {
        let voters = vec![Address([1u8; 20]), Address([2u8; 20])];
        let err = SigningPolicy::new(1, 10, 100, [0u8; 32], voters, vec![u16::MAX, 1]).unwrap_err();
        assert_eq!(err, PolicyError::WeightOverflow(u64::from(u16::MAX) + 1));
    }

    #[test]
    fn policy_rejects_epoch_beyond_u24() {
        let err =
            SigningPolicy::new(1 << 24, 10, 100, [0u8; 32], vec![], vec![]).unwrap_err();
        assert_eq!(err, PolicyError::EpochOutOfRange(1 << 24));
    }

    #[test]
    fn policy_accepts_weight_sum_at_ceiling() {
        let voters = vec![Address([1u8; 20]), Address([2u8; 20])];
        let policy =
            SigningPolicy::new(1, 10, 100, [0u8; 32], voters, vec![u16::MAX - 1, 1]).unwrap();
        assert_eq!(policy.total_weight(), u32::from(u16::MAX));
    }
}
