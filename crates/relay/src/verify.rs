// Path: crates/relay/src/verify.rs
//! The weighted-threshold signature verifier.
//!
//! A signature list is valid for a policy and message hash when every entry
//! recovers to the voter at its claimed index and the accumulated weight
//! reaches the effective threshold. Lists must carry strictly increasing
//! signer indices: that single invariant rules out duplicates in one O(n)
//! pass and forces submitters to construct the canonical, sorted list, so a
//! correctly-signed but out-of-order list is rejected regardless of weight.

use qmr_crypto::SignerRecovery;
use qmr_types::error::VerifyError;
use qmr_types::{Hash32, IndexedSignature, SigningPolicy};

/// Verifies a signature list against a policy and message hash.
///
/// Returns the accumulated weight on success. `effective_threshold` is the
/// policy threshold under normal operation and the grace-window-increased
/// value when the relay verifies against the previous epoch's policy; the
/// relay computes it, this function only enforces it.
///
/// Any failure is terminal: no partial weight survives the call.
pub fn verify_signatures<R: SignerRecovery>(
    policy: &SigningPolicy,
    message_hash: &Hash32,
    signatures: &[IndexedSignature],
    effective_threshold: u32,
    recovery: &R,
) -> Result<u32, VerifyError> {
    if signatures.is_empty() {
        return Err(VerifyError::NoSignatures);
    }

    let mut total_weight: u32 = 0;
    let mut previous_index: Option<u16> = None;
    for (position, signature) in signatures.iter().enumerate() {
        let index = signature.signer_index;
        if previous_index.is_some_and(|prev| index <= prev) {
            return Err(VerifyError::UnsortedOrDuplicateIndex { index, position });
        }
        previous_index = Some(index);
        // Fetch voter and weight together: a caller-built policy may violate
        // the equal-length invariant, and an index past either sequence is
        // out of range.
        let (Some(voter), Some(weight)) = (
            policy.voters.get(usize::from(index)),
            policy.weights.get(usize::from(index)).copied(),
        ) else {
            return Err(VerifyError::IndexOutOfRange {
                index,
                voters: policy.voters.len().min(policy.weights.len()),
            });
        };
        let recovered =
            recovery.recover(message_hash, &signature.r, &signature.s, signature.v)?;
        if recovered != *voter {
            return Err(VerifyError::SignerMismatch {
                index,
                expected: voter.to_string(),
                recovered: recovered.to_string(),
            });
        }
        // Weight sums fit u32 by the policy invariant (total <= 65535).
        total_weight += u32::from(weight);
    }

    if total_weight < effective_threshold {
        return Err(VerifyError::ThresholdNotMet {
            total: total_weight,
            required: effective_threshold,
        });
    }
    Ok(total_weight)
}
