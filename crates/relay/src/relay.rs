// Path: crates/relay/src/relay.rs
//! The relay state machine.
//!
//! One instance owns the sequence of installed signing policies and the
//! write-once confirmed-root table. Submitted payloads are applied one at a
//! time (`&mut self`); every operation validates fully before mutating, so a
//! failed call leaves the state exactly as it was.

use crate::policy::policy_hash;
use crate::verify::verify_signatures;
use qmr_crypto::{Secp256k1Recovery, SignerRecovery};
use qmr_state::merkle::verify_proof;
use qmr_types::codec::{decode_signature_list, WireDecode, WireEncode};
use qmr_types::error::RelayError;
use qmr_types::{Hash32, ProtocolMessage, SigningPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Tuning knobs for the rotation grace window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Basis-point multiplier applied to the previous epoch's threshold when
    /// it is used inside the grace window. Meant to exceed 10000 (i.e. > 1x);
    /// values at or below 10000 are clamped to 10000, so the grace-window
    /// threshold is never lower than the normal one.
    pub threshold_increase_bips: u16,
    /// Number of rounds after an epoch's starting round during which the
    /// previous epoch's policy is still accepted at the increased threshold.
    pub grace_window_rounds: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { threshold_increase_bips: 12000, grace_window_rounds: 90 }
    }
}

/// The persistent state of a relay instance.
///
/// Grows monotonically; entries are never deleted. Serializable so embedders
/// can persist and re-load it; external consumers query it by epoch, round
/// and protocol key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayState {
    /// The newest reward epoch a policy has been installed for.
    pub last_initialized_epoch: u32,
    /// First governed round per installed epoch.
    pub starting_round_ids: BTreeMap<u32, u32>,
    /// Canonical policy hash per installed epoch.
    pub signing_policy_hashes: BTreeMap<u32, Hash32>,
    /// Confirmed Merkle root per (protocol, round); set at most once per key.
    pub confirmed_roots: BTreeMap<(u8, u32), Hash32>,
}

impl RelayState {
    /// The installed epoch governing `round_id`: the newest installed epoch
    /// whose starting round is at or before it.
    fn governing_epoch(&self, round_id: u32) -> Option<u32> {
        self.starting_round_ids
            .iter()
            .rev()
            .find(|(_, start)| **start <= round_id)
            .map(|(epoch, _)| *epoch)
    }
}

/// Outcome of a successful [`Relay::confirm_message`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The root was stored now, with the weight the signature list carried.
    Confirmed {
        /// Accumulated signing weight of the accepted list.
        total_weight: u32,
    },
    /// The identical root was already confirmed; the call was a no-op.
    ///
    /// Two submitters racing with the same payload must both observe
    /// success, not a spurious conflict.
    AlreadyConfirmed,
}

/// The relay state machine.
///
/// Generic over the signer-recovery capability; production use is
/// [`Secp256k1Recovery`].
#[derive(Debug, Clone)]
pub struct Relay<R = Secp256k1Recovery> {
    config: RelayConfig,
    state: RelayState,
    recovery: R,
}

impl Relay<Secp256k1Recovery> {
    /// Bootstraps a relay from its first signing policy.
    ///
    /// Only the policy's hash and starting round are retained; the relay
    /// never stores policy bytes.
    pub fn new(config: RelayConfig, initial_policy: &SigningPolicy) -> Result<Self, RelayError> {
        Self::with_recovery(config, initial_policy, Secp256k1Recovery)
    }
}

impl<R: SignerRecovery> Relay<R> {
    /// Bootstraps a relay with an explicit recovery capability.
    pub fn with_recovery(
        config: RelayConfig,
        initial_policy: &SigningPolicy,
        recovery: R,
    ) -> Result<Self, RelayError> {
        initial_policy.validate()?;
        let epoch = initial_policy.reward_epoch_id;
        let mut state = RelayState { last_initialized_epoch: epoch, ..RelayState::default() };
        state.starting_round_ids.insert(epoch, initial_policy.starting_round_id);
        state.signing_policy_hashes.insert(epoch, policy_hash(initial_policy));
        info!(
            target: "relay",
            epoch,
            starting_round = initial_policy.starting_round_id,
            "relay initialized with first signing policy"
        );
        Ok(Self { config, state, recovery })
    }

    /// Installs the signing policy for the next reward epoch.
    ///
    /// `active_policy_bytes` must encode the policy currently installed for
    /// the newest epoch; requiring it proves the submitter knows the real
    /// current state and stops a stale or forged submission from resetting
    /// the rotation. The next policy must carry exactly the following epoch
    /// id, so epochs can never be skipped.
    pub fn install_next_signing_policy(
        &mut self,
        active_policy_bytes: &[u8],
        next_policy_bytes: &[u8],
    ) -> Result<(), RelayError> {
        let active = SigningPolicy::decode(active_policy_bytes)?;
        let next = SigningPolicy::decode(next_policy_bytes)?;
        next.validate()?;

        let current_epoch = self.state.last_initialized_epoch;
        let stored_hash = self.state.signing_policy_hashes.get(&current_epoch);
        if stored_hash != Some(&policy_hash(&active)) {
            warn!(
                target: "relay",
                claimed_epoch = active.reward_epoch_id,
                current_epoch,
                "active policy in install submission does not match stored state"
            );
            return Err(RelayError::EpochMismatch {
                expected: current_epoch,
                got: active.reward_epoch_id,
            });
        }
        if next.reward_epoch_id != current_epoch + 1 {
            return Err(RelayError::EpochMismatch {
                expected: current_epoch + 1,
                got: next.reward_epoch_id,
            });
        }
        if next.starting_round_id < active.starting_round_id {
            return Err(RelayError::NonMonotonicStartingRound {
                active: active.starting_round_id,
                next: next.starting_round_id,
            });
        }

        self.state.last_initialized_epoch = next.reward_epoch_id;
        self.state.starting_round_ids.insert(next.reward_epoch_id, next.starting_round_id);
        self.state.signing_policy_hashes.insert(next.reward_epoch_id, policy_hash(&next));
        info!(
            target: "relay",
            epoch = next.reward_epoch_id,
            starting_round = next.starting_round_id,
            threshold = next.threshold,
            voters = next.voters.len(),
            "installed next signing policy"
        );
        Ok(())
    }

    /// Confirms a protocol message if a quorum of signing weight approved it.
    ///
    /// The supplied policy must hash-match the policy governing the message's
    /// round, or the immediately preceding epoch's policy while the round is
    /// still inside the grace window (at the increased threshold).
    pub fn confirm_message(
        &mut self,
        policy_bytes: &[u8],
        message_bytes: &[u8],
        signature_bytes: &[u8],
    ) -> Result<ConfirmOutcome, RelayError> {
        let policy = SigningPolicy::decode(policy_bytes)?;
        let message = ProtocolMessage::decode(message_bytes)?;
        let signatures = decode_signature_list(signature_bytes)?;

        let round_id = message.round_id;
        let governing = self
            .state
            .governing_epoch(round_id)
            .ok_or(RelayError::RoundBeforeFirstPolicy(round_id))?;
        let supplied_hash = policy_hash(&policy);

        let effective_threshold = if self.state.signing_policy_hashes.get(&governing)
            == Some(&supplied_hash)
        {
            u32::from(policy.threshold)
        } else if self.grace_window_applies(governing, round_id, &supplied_hash) {
            let increased = increased_threshold(policy.threshold, self.config.threshold_increase_bips);
            debug!(
                target: "relay",
                round_id,
                governing,
                increased,
                "accepting previous epoch's policy inside the grace window"
            );
            increased
        } else {
            return Err(RelayError::WrongPolicyForRound {
                policy_epoch: policy.reward_epoch_id,
                round_id,
            });
        };

        let message_hash = qmr_crypto::keccak256(message.encode());
        let total_weight = verify_signatures(
            &policy,
            &message_hash,
            &signatures,
            effective_threshold,
            &self.recovery,
        )?;

        let key = (message.protocol_id, round_id);
        match self.state.confirmed_roots.get(&key) {
            None => {
                self.state.confirmed_roots.insert(key, message.merkle_root);
                info!(
                    target: "relay",
                    protocol_id = message.protocol_id,
                    round_id,
                    total_weight,
                    root = %hex::encode(&message.merkle_root[..4]),
                    "confirmed merkle root"
                );
                Ok(ConfirmOutcome::Confirmed { total_weight })
            }
            Some(existing) if *existing == message.merkle_root => {
                debug!(
                    target: "relay",
                    protocol_id = message.protocol_id,
                    round_id,
                    "root already confirmed, no-op"
                );
                Ok(ConfirmOutcome::AlreadyConfirmed)
            }
            Some(existing) => {
                warn!(
                    target: "relay",
                    protocol_id = message.protocol_id,
                    round_id,
                    stored = %hex::encode(&existing[..4]),
                    submitted = %hex::encode(&message.merkle_root[..4]),
                    "rejected conflicting root for an already-confirmed round"
                );
                Err(RelayError::RootConflict { protocol_id: message.protocol_id, round_id })
            }
        }
    }

    /// Whether the previous epoch's policy may still confirm `round_id`.
    fn grace_window_applies(&self, governing: u32, round_id: u32, supplied_hash: &Hash32) -> bool {
        let Some(previous) = governing.checked_sub(1) else {
            return false;
        };
        if self.state.signing_policy_hashes.get(&previous) != Some(supplied_hash) {
            return false;
        }
        let Some(governing_start) = self.state.starting_round_ids.get(&governing) else {
            return false;
        };
        round_id < governing_start.saturating_add(self.config.grace_window_rounds)
    }

    /// The confirmed root for `(protocol_id, round_id)`, if any.
    pub fn confirmed_root(&self, protocol_id: u8, round_id: u32) -> Option<Hash32> {
        self.state.confirmed_roots.get(&(protocol_id, round_id)).copied()
    }

    /// The stored policy hash for a reward epoch, if installed.
    pub fn signing_policy_hash(&self, reward_epoch_id: u32) -> Option<Hash32> {
        self.state.signing_policy_hashes.get(&reward_epoch_id).copied()
    }

    /// The first round governed by a reward epoch, if installed.
    pub fn starting_round_id(&self, reward_epoch_id: u32) -> Option<u32> {
        self.state.starting_round_ids.get(&reward_epoch_id).copied()
    }

    /// The newest reward epoch a policy has been installed for.
    pub fn last_initialized_epoch(&self) -> u32 {
        self.state.last_initialized_epoch
    }

    /// Checks an attestation leaf against the confirmed root for its round.
    ///
    /// `false` both when the proof mismatches and when no root is confirmed.
    pub fn verify_leaf(
        &self,
        protocol_id: u8,
        round_id: u32,
        leaf: &Hash32,
        proof: &[Hash32],
    ) -> bool {
        match self.confirmed_root(protocol_id, round_id) {
            Some(root) => verify_proof(&root, leaf, proof),
            None => false,
        }
    }

    /// Read access to the full persisted state for external consumers.
    pub fn state(&self) -> &RelayState {
        &self.state
    }
}

/// The grace-window threshold: `ceil(threshold * bips / 10000)`, saturating
/// at the u16 weight ceiling. Multipliers below 1x are clamped so the result
/// never undercuts the normal threshold.
fn increased_threshold(threshold: u16, bips: u16) -> u32 {
    let scaled = u64::from(threshold) * u64::from(bips.max(10_000));
    let ceiled = scaled.div_ceil(10_000);
    u32::try_from(ceiled.min(u64::from(u16::MAX))).unwrap_or(u32::from(u16::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increased_threshold_rounds_up() {
        assert_eq!(increased_threshold(400, 12000), 480);
        assert_eq!(increased_threshold(1, 10001), 2);
        assert_eq!(increased_threshold(333, 15000), 500);
    }

    #[test]
    fn increased_threshold_saturates_at_weight_ceiling() {
        assert_eq!(increased_threshold(u16::MAX, 20000), u32::from(u16::MAX));
    }

    #[test]
    fn increased_threshold_never_undercuts_the_normal_threshold() {
        // A sub-1x multiplier must not weaken the grace window.
        assert_eq!(increased_threshold(400, 5000), 400);
        assert_eq!(increased_threshold(400, 10000), 400);
        assert_eq!(increased_threshold(400, 0), 400);
    }

    #[test]
    fn governing_epoch_picks_newest_started() {
        let mut state = RelayState::default();
        state.starting_round_ids.insert(5, 1000);
        state.starting_round_ids.insert(6, 1200);
        assert_eq!(state.governing_epoch(999), None);
        assert_eq!(state.governing_epoch(1000), Some(5));
        assert_eq!(state.governing_epoch(1199), Some(5));
        assert_eq!(state.governing_epoch(1200), Some(6));
        assert_eq!(state.governing_epoch(u32::MAX), Some(6));
    }

    #[test]
    fn relay_state_serializes_for_persistence() {
        let mut state = RelayState::default();
        state.last_initialized_epoch = 5;
        state.starting_round_ids.insert(5, 1000);
        state.signing_policy_hashes.insert(5, [9; 32]);
        state.confirmed_roots.insert((1, 1000), [8; 32]);
        let bytes = bincode::serialize(&state).unwrap();
        let restored: RelayState = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored.last_initialized_epoch, 5);
        assert_eq!(restored.confirmed_roots.get(&(1, 1000)), Some(&[8u8; 32]));
    }
}
