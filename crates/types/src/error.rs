// Path: crates/types/src/error.rs
//! Core error types for the QMR workspace.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors from the fixed-layout binary codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The input is shorter than the structure's minimum size, a declared
    /// array length implies more bytes than remain, or a field holds a value
    /// outside its domain.
    #[error("Malformed {structure} encoding: {detail}")]
    MalformedEncoding {
        /// The wire structure being decoded.
        structure: &'static str,
        /// What was wrong with the bytes.
        detail: String,
    },
    /// Strict decode consumed the structure but bytes were left over.
    #[error("{structure} encoding followed by {remaining} trailing bytes")]
    TrailingBytes {
        /// The wire structure being decoded.
        structure: &'static str,
        /// Number of unconsumed bytes.
        remaining: usize,
    },
}

impl ErrorCode for CodecError {
    fn code(&self) -> &'static str {
        match self {
            Self::MalformedEncoding { .. } => "CODEC_MALFORMED_ENCODING",
            Self::TrailingBytes { .. } => "CODEC_TRAILING_BYTES",
        }
    }
}

/// Errors from cryptographic operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The provided signature material is malformed or recovery failed.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    /// A hash digest had an unexpected length.
    #[error("Invalid hash length: expected {expected}, got {got}")]
    InvalidHashLength {
        /// The expected length in bytes.
        expected: usize,
        /// The actual length in bytes.
        got: usize,
    },
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidSignature(_) => "CRYPTO_INVALID_SIGNATURE",
            Self::InvalidHashLength { .. } => "CRYPTO_INVALID_HASH_LENGTH",
        }
    }
}

/// Errors raised when constructing or validating a signing policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// The voter and weight sequences have different lengths.
    #[error("Voter/weight length mismatch: {voters} voters, {weights} weights")]
    LengthMismatch {
        /// Number of voter addresses.
        voters: usize,
        /// Number of weight entries.
        weights: usize,
    },
    /// The sum of all voter weights exceeds the normalized ceiling of 65535.
    #[error("Total voter weight {0} exceeds 65535")]
    WeightOverflow(u64),
    /// More voters than the u16 count field can describe.
    #[error("Voter count {0} exceeds the wire maximum of 65535")]
    TooManyVoters(usize),
    /// The reward epoch id does not fit the u24 wire field.
    #[error("Reward epoch id {0} exceeds the wire maximum of 2^24-1")]
    EpochOutOfRange(u32),
}

impl ErrorCode for PolicyError {
    fn code(&self) -> &'static str {
        match self {
            Self::LengthMismatch { .. } => "POLICY_LENGTH_MISMATCH",
            Self::WeightOverflow(_) => "POLICY_WEIGHT_OVERFLOW",
            Self::TooManyVoters(_) => "POLICY_TOO_MANY_VOTERS",
            Self::EpochOutOfRange(_) => "POLICY_EPOCH_OUT_OF_RANGE",
        }
    }
}

/// Terminal verification failures from the weighted-threshold verifier.
///
/// Every variant is a hard "not confirmed" outcome: the relay never retries
/// and never applies partial weight.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    /// The signature list was empty.
    #[error("Signature list is empty")]
    NoSignatures,
    /// A signer index was not strictly greater than its predecessor.
    #[error("Signer index {index} at position {position} is not strictly increasing")]
    UnsortedOrDuplicateIndex {
        /// The offending signer index.
        index: u16,
        /// Position of the entry in the signature list.
        position: usize,
    },
    /// A signer index points past the end of the policy's voter list.
    #[error("Signer index {index} out of range for {voters} voters")]
    IndexOutOfRange {
        /// The offending signer index.
        index: u16,
        /// Number of voters in the policy.
        voters: usize,
    },
    /// The recovered signer does not match the voter at the claimed index.
    #[error("Recovered signer {recovered} does not match voter {expected} at index {index}")]
    SignerMismatch {
        /// The claimed signer index.
        index: u16,
        /// The voter address stored in the policy, hex-encoded.
        expected: String,
        /// The address recovered from the signature, hex-encoded.
        recovered: String,
    },
    /// Signature recovery itself failed on malformed input.
    #[error("Signature recovery failed: {0}")]
    InvalidSignature(#[from] CryptoError),
    /// All signatures were valid but their accumulated weight fell short.
    #[error("Accumulated weight {total} below required threshold {required}")]
    ThresholdNotMet {
        /// The weight the list accumulated.
        total: u32,
        /// The effective threshold it had to reach.
        required: u32,
    },
}

impl ErrorCode for VerifyError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoSignatures => "VERIFY_NO_SIGNATURES",
            Self::UnsortedOrDuplicateIndex { .. } => "VERIFY_UNSORTED_OR_DUPLICATE_INDEX",
            Self::IndexOutOfRange { .. } => "VERIFY_INDEX_OUT_OF_RANGE",
            Self::SignerMismatch { .. } => "VERIFY_SIGNER_MISMATCH",
            Self::InvalidSignature(_) => "VERIFY_INVALID_SIGNATURE",
            Self::ThresholdNotMet { .. } => "VERIFY_THRESHOLD_NOT_MET",
        }
    }
}

/// Errors from the relay state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    /// A submitted payload failed to decode.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    /// A submitted policy violated the signing-policy invariants.
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),
    /// The weighted-threshold verifier rejected the submission.
    #[error("Verification failed: {0}")]
    Verify(#[from] VerifyError),
    /// The supplied "current" policy does not match stored state, or the next
    /// policy does not advance the initialized epoch by exactly one.
    #[error("Epoch mismatch: expected epoch {expected}, got {got}")]
    EpochMismatch {
        /// The epoch the relay expected.
        expected: u32,
        /// The epoch the submission carried.
        got: u32,
    },
    /// The next policy's starting round moves backwards.
    #[error("Starting round {next} of the next policy precedes the active policy's {active}")]
    NonMonotonicStartingRound {
        /// The active policy's starting round.
        active: u32,
        /// The next policy's starting round.
        next: u32,
    },
    /// The supplied policy is not authoritative for the message's round.
    #[error("Policy for epoch {policy_epoch} does not govern round {round_id}")]
    WrongPolicyForRound {
        /// The epoch of the supplied policy.
        policy_epoch: u32,
        /// The round of the message being confirmed.
        round_id: u32,
    },
    /// A different root was already confirmed for this (protocol, round).
    #[error("Root conflict for protocol {protocol_id} round {round_id}: a different root is already confirmed")]
    RootConflict {
        /// The sub-protocol id.
        protocol_id: u8,
        /// The voting round id.
        round_id: u32,
    },
    /// The message's round predates the first installed signing policy.
    #[error("Round {0} predates the first installed signing policy")]
    RoundBeforeFirstPolicy(u32),
}

impl ErrorCode for RelayError {
    fn code(&self) -> &'static str {
        match self {
            Self::Codec(_) => "RELAY_CODEC_ERROR",
            Self::Policy(_) => "RELAY_POLICY_ERROR",
            Self::Verify(_) => "RELAY_VERIFY_ERROR",
            Self::EpochMismatch { .. } => "RELAY_EPOCH_MISMATCH",
            Self::NonMonotonicStartingRound { .. } => "RELAY_NON_MONOTONIC_STARTING_ROUND",
            Self::WrongPolicyForRound { .. } => "RELAY_WRONG_POLICY_FOR_ROUND",
            Self::RootConflict { .. } => "RELAY_ROOT_CONFLICT",
            Self::RoundBeforeFirstPolicy(_) => "RELAY_ROUND_BEFORE_FIRST_POLICY",
        }
    }
}
