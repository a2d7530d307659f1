// Path: crates/relay/src/policy.rs
//! Signing-policy identity and construction.
//!
//! The canonical identity of a policy is the keccak-256 hash of its wire
//! encoding. Hash and encoding are frozen together: changing either changes
//! the meaning of every signature downstream, so this module is the only
//! place the hash is computed.

use qmr_crypto::keccak256;
use qmr_types::codec::WireEncode;
use qmr_types::error::PolicyError;
use qmr_types::{Address, Hash32, SigningPolicy};

/// The canonical identity hash of a signing policy.
///
/// This is the value stored per epoch by the relay and embedded in
/// downstream policy-pointer fields.
pub fn policy_hash(policy: &SigningPolicy) -> Hash32 {
    keccak256(policy.encode())
}

/// Source of the committee snapshot for a reward epoch.
///
/// Consulted once, at policy-construction time; the relay itself never calls
/// back into the registry. Implementations return voters in the canonical
/// registration order (ascending normalized weight) with index-aligned
/// weights.
pub trait VoterRegistry {
    /// The committee and weights for `reward_epoch_id`.
    fn committee(&self, reward_epoch_id: u32) -> (Vec<Address>, Vec<u16>);
}

/// Captures a registry snapshot into an immutable signing policy.
pub fn build_policy<R: VoterRegistry>(
    registry: &R,
    reward_epoch_id: u32,
    starting_round_id: u32,
    threshold: u16,
    seed: Hash32,
) -> Result<SigningPolicy, PolicyError> {
    let (voters, weights) = registry.committee(reward_epoch_id);
    SigningPolicy::new(reward_epoch_id, starting_round_id, threshold, seed, voters, weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(seed: u8) -> SigningPolicy {
        SigningPolicy {
            reward_epoch_id: 5,
            starting_round_id: 1000,
            threshold: 400,
            seed: [seed; 32],
            voters: vec![Address([1; 20]), Address([2; 20])],
            weights: vec![100, 200],
        }
    }

    #[test]
    fn equal_policies_hash_identically() {
        assert_eq!(policy_hash(&policy(7)), policy_hash(&policy(7)));
    }

    #[test]
    fn any_field_change_changes_the_hash() {
        let base = policy_hash(&policy(7));
        assert_ne!(base, policy_hash(&policy(8)));
        let mut shifted = policy(7);
        shifted.threshold += 1;
        assert_ne!(base, policy_hash(&shifted));
        let mut reweighted = policy(7);
        reweighted.weights[0] += 1;
        assert_ne!(base, policy_hash(&reweighted));
    }

    struct StaticRegistry {
        voters: Vec<Address>,
        weights: Vec<u16>,
    }

    impl VoterRegistry for StaticRegistry {
        fn committee(&self, _reward_epoch_id: u32) -> (Vec<Address>, Vec<u16>) {
            (self.voters.clone(), self.weights.clone())
        }
    }

    #[test]
    fn build_policy_captures_the_registry_snapshot() {
        let registry = StaticRegistry {
            voters: vec![Address([9; 20])],
            weights: vec![500],
        };
        let built = build_policy(&registry, 3, 600, 300, [0; 32]).unwrap();
        assert_eq!(built.voters, registry.voters);
        assert_eq!(built.weights, registry.weights);
        assert_eq!(built.reward_epoch_id, 3);
    }

    #[test]
    fn build_policy_rejects_invalid_registry_data() {
        let registry = StaticRegistry {
            voters: vec![Address([9; 20]), Address([8; 20])],
            weights: vec![u16::MAX, u16::MAX],
        };
        assert!(build_policy(&registry, 3, 600, 300, [0; 32]).is_err());
    }
}
