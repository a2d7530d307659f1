// Path: crates/types/src/codec.rs
//! Defines the canonical, fixed-layout binary codec for all wire structures.
//!
//! Every integer is big-endian and every field has a fixed width; the only
//! variable-length data (voter/weight sequences, envelope payloads) is
//! length-prefixed by a count field inside the structure's own header. By
//! centralizing the codec here in the base `types` crate we guarantee that
//! signers, submitters and verifiers all hash the exact same bytes.
//!
//! Two decode modes exist. [`WireDecode::decode`] is strict: the buffer must
//! contain exactly one structure, and trailing bytes are an error.
//! [`WireDecode::decode_prefix`] is lenient: it accepts a longer buffer and
//! reports the number of bytes consumed, so back-to-back structures (payload
//! multiplexing, signature lists) can be walked without truncation or
//! double-counting. Lenient mode never silently ignores a malformed tail;
//! the caller sees the consumed length and decides.

use crate::error::CodecError;
use crate::wire::{Address, IndexedSignature, PayloadMessage, ProtocolMessage, SigningPolicy};

/// Wire size of a [`ProtocolMessage`]: id + round + flag + root.
pub const PROTOCOL_MESSAGE_BYTES: usize = 1 + 4 + 1 + 32;
/// Wire size of an [`IndexedSignature`]: index + r + s + v.
pub const INDEXED_SIGNATURE_BYTES: usize = 2 + 32 + 32 + 1;
/// Wire size of a [`SigningPolicy`] header: epoch + round + threshold + seed + count.
pub const SIGNING_POLICY_HEADER_BYTES: usize = 3 + 4 + 2 + 32 + 2;
/// Wire size of a [`PayloadMessage`] header: id + round + size.
pub const PAYLOAD_HEADER_BYTES: usize = 1 + 4 + 2;

/// Deterministic, injective encoding into the protocol ABI.
pub trait WireEncode {
    /// Encodes the structure into its exact wire bytes.
    ///
    /// Total for every value satisfying the structure's model invariants
    /// (count and size fields fit u16, epoch ids fit u24).
    fn encode(&self) -> Vec<u8>;
}

/// Decoding from the protocol ABI.
pub trait WireDecode: Sized {
    /// The structure name used in error reports.
    const STRUCTURE: &'static str;

    /// Lenient decode: reads one structure from the front of `input` and
    /// returns it together with the number of bytes consumed.
    fn decode_prefix(input: &[u8]) -> Result<(Self, usize), CodecError>;

    /// Strict decode: the buffer must hold exactly one structure.
    fn decode(input: &[u8]) -> Result<Self, CodecError> {
        let (value, consumed) = Self::decode_prefix(input)?;
        if consumed != input.len() {
            return Err(CodecError::TrailingBytes {
                structure: Self::STRUCTURE,
                remaining: input.len() - consumed,
            });
        }
        Ok(value)
    }
}

/// Byte cursor shared by all decoders; tracks the consumed count and renders
/// uniform truncation errors.
struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
    structure: &'static str,
}

impl<'a> Reader<'a> {
    fn new(input: &'a [u8], structure: &'static str) -> Self {
        Self { input, pos: 0, structure }
    }

    fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], CodecError> {
        let remaining = self.input.len() - self.pos;
        if remaining < n {
            return Err(CodecError::MalformedEncoding {
                structure: self.structure,
                detail: format!("{field} needs {n} bytes, {remaining} remain"),
            });
        }
        let slice = &self.input[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self, field: &'static str) -> Result<u8, CodecError> {
        Ok(self.take(1, field)?[0])
    }

    fn u16(&mut self, field: &'static str) -> Result<u16, CodecError> {
        let b = self.take(2, field)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u24(&mut self, field: &'static str) -> Result<u32, CodecError> {
        let b = self.take(3, field)?;
        Ok(u32::from_be_bytes([0, b[0], b[1], b[2]]))
    }

    fn u32(&mut self, field: &'static str) -> Result<u32, CodecError> {
        let b = self.take(4, field)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn hash32(&mut self, field: &'static str) -> Result<[u8; 32], CodecError> {
        let mut out = [0u8; 32];
        out.copy_from_slice(self.take(32, field)?);
        Ok(out)
    }

    fn consumed(&self) -> usize {
        self.pos
    }
}

impl WireEncode for SigningPolicy {
    fn encode(&self) -> Vec<u8> {
        debug_assert!(self.validate().is_ok());
        let count = self.voters.len();
        let mut out = Vec::with_capacity(SIGNING_POLICY_HEADER_BYTES + 22 * count);
        out.extend_from_slice(&self.reward_epoch_id.to_be_bytes()[1..4]);
        out.extend_from_slice(&self.starting_round_id.to_be_bytes());
        out.extend_from_slice(&self.threshold.to_be_bytes());
        out.extend_from_slice(&self.seed);
        out.extend_from_slice(&(count as u16).to_be_bytes());
        for voter in &self.voters {
            out.extend_from_slice(&voter.0);
        }
        for weight in &self.weights {
            out.extend_from_slice(&weight.to_be_bytes());
        }
        out
    }
}

impl WireDecode for SigningPolicy {
    const STRUCTURE: &'static str = "SigningPolicy";

    fn decode_prefix(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut r = Reader::new(input, Self::STRUCTURE);
        let reward_epoch_id = r.u24("rewardEpochId")?;
        let starting_round_id = r.u32("startingRoundId")?;
        let threshold = r.u16("threshold")?;
        let seed = r.hash32("seed")?;
        let count = r.u16("voterCount")? as usize;
        let mut voters = Vec::with_capacity(count);
        for _ in 0..count {
            let mut addr = [0u8; 20];
            addr.copy_from_slice(r.take(20, "voters")?);
            voters.push(Address(addr));
        }
        let mut weights = Vec::with_capacity(count);
        for _ in 0..count {
            weights.push(r.u16("weights")?);
        }
        let policy =
            Self { reward_epoch_id, starting_round_id, threshold, seed, voters, weights };
        Ok((policy, r.consumed()))
    }
}

impl WireEncode for ProtocolMessage {
    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PROTOCOL_MESSAGE_BYTES);
        out.push(self.protocol_id);
        out.extend_from_slice(&self.round_id.to_be_bytes());
        out.push(u8::from(self.random_quality));
        out.extend_from_slice(&self.merkle_root);
        out
    }
}

impl WireDecode for ProtocolMessage {
    const STRUCTURE: &'static str = "ProtocolMessage";

    fn decode_prefix(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut r = Reader::new(input, Self::STRUCTURE);
        let protocol_id = r.u8("protocolId")?;
        let round_id = r.u32("roundId")?;
        let random_quality = match r.u8("randomQualityFlag")? {
            0 => false,
            1 => true,
            other => {
                return Err(CodecError::MalformedEncoding {
                    structure: Self::STRUCTURE,
                    detail: format!("randomQualityFlag must be 0 or 1, got {other}"),
                })
            }
        };
        let merkle_root = r.hash32("merkleRoot")?;
        let message = Self { protocol_id, round_id, random_quality, merkle_root };
        Ok((message, r.consumed()))
    }
}

impl WireEncode for IndexedSignature {
    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(INDEXED_SIGNATURE_BYTES);
        out.extend_from_slice(&self.signer_index.to_be_bytes());
        out.extend_from_slice(&self.r);
        out.extend_from_slice(&self.s);
        out.push(self.v);
        out
    }
}

impl WireDecode for IndexedSignature {
    const STRUCTURE: &'static str = "IndexedSignature";

    fn decode_prefix(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut rd = Reader::new(input, Self::STRUCTURE);
        let signer_index = rd.u16("signerIndex")?;
        let r = rd.hash32("r")?;
        let s = rd.hash32("s")?;
        let v = rd.u8("v")?;
        Ok((Self { signer_index, r, s, v }, rd.consumed()))
    }
}

impl WireEncode for PayloadMessage {
    fn encode(&self) -> Vec<u8> {
        debug_assert!(self.payload.len() <= usize::from(u16::MAX));
        let mut out = Vec::with_capacity(PAYLOAD_HEADER_BYTES + self.payload.len());
        out.push(self.protocol_id);
        out.extend_from_slice(&self.round_id.to_be_bytes());
        out.extend_from_slice(&(self.payload.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.payload);
        out
    }
}

impl WireDecode for PayloadMessage {
    const STRUCTURE: &'static str = "PayloadMessage";

    fn decode_prefix(input: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut r = Reader::new(input, Self::STRUCTURE);
        let protocol_id = r.u8("protocolId")?;
        let round_id = r.u32("roundId")?;
        let size = r.u16("size")? as usize;
        let payload = r.take(size, "payload")?.to_vec();
        Ok((Self { protocol_id, round_id, payload }, r.consumed()))
    }
}

/// Decodes a buffer holding back-to-back [`IndexedSignature`] records.
///
/// The whole buffer must be an exact multiple of signature records; a partial
/// record at the tail is a malformed encoding, never ignored.
pub fn decode_signature_list(input: &[u8]) -> Result<Vec<IndexedSignature>, CodecError> {
    let mut signatures = Vec::with_capacity(input.len() / INDEXED_SIGNATURE_BYTES);
    let mut offset = 0;
    while offset < input.len() {
        let (signature, consumed) = IndexedSignature::decode_prefix(&input[offset..])?;
        offset += consumed;
        signatures.push(signature);
    }
    Ok(signatures)
}

/// Decodes a buffer holding back-to-back [`PayloadMessage`] envelopes.
///
/// Used to demultiplex several sub-protocols' signed payloads submitted in
/// one transaction. A tail that is not a whole envelope is rejected.
pub fn decode_payload_stream(input: &[u8]) -> Result<Vec<PayloadMessage>, CodecError> {
    let mut messages = Vec::new();
    let mut offset = 0;
    while offset < input.len() {
        let (message, consumed) = PayloadMessage::decode_prefix(&input[offset..])?;
        offset += consumed;
        messages.push(message);
    }
    Ok(messages)
}
