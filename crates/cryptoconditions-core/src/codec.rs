//! Top-level reader and writer for conditions and fulfillments.
//!
//! Dispatch is by the outer tag: `0xA0 | type-id`. Writers serialize the
//! fields a value already holds and never re-derive anything.

use std::cmp::Ordering;

use bytes::Bytes;

use crate::canonical::compare_encoded;
use crate::condition::Condition;
use crate::der::{encode_tlv, tags, write_tlv, DerReader, Tag, DEFAULT_MAX_LENGTH};
use crate::error::DecodeError;
use crate::fulfillment::{
    Ed25519Fulfillment, Fulfillment, PrefixFulfillment, PreimageFulfillment, RsaFulfillment,
    ThresholdFulfillment,
};
use crate::types::{ConditionType, ConditionTypeSet, Fingerprint};
use crate::uint::{u64_from_der_integer, u64_to_der_integer};

/// Default maximum nesting of prefix and threshold structures.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Bounds applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Ceiling for any single declared length.
    pub max_length: usize,
    /// Maximum nesting of compound fulfillments.
    pub max_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeLimits {
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Decode a condition with default limits.
pub fn read_condition(bytes: &[u8]) -> Result<Condition, DecodeError> {
    read_condition_with(bytes, &DecodeLimits::default())
}

/// Decode a condition.
pub fn read_condition_with(bytes: &[u8], limits: &DecodeLimits) -> Result<Condition, DecodeError> {
    let mut reader = DerReader::with_max_length(bytes, limits.max_length);
    let condition = read_condition_from(&mut reader)?;
    reader.finish()?;
    Ok(condition)
}

/// Decode a fulfillment with default limits.
pub fn read_fulfillment(bytes: &[u8]) -> Result<Fulfillment, DecodeError> {
    read_fulfillment_with(bytes, &DecodeLimits::default())
}

/// Decode a fulfillment.
pub fn read_fulfillment_with(
    bytes: &[u8],
    limits: &DecodeLimits,
) -> Result<Fulfillment, DecodeError> {
    let mut reader = DerReader::with_max_length(bytes, limits.max_length);
    let fulfillment = read_fulfillment_from(&mut reader, limits, 0)?;
    reader.finish()?;
    Ok(fulfillment)
}

/// Encode a condition.
pub fn write_condition(condition: &Condition) -> Vec<u8> {
    let mut body = Vec::with_capacity(48);
    write_tlv(&mut body, tags::context(0), condition.fingerprint().as_bytes());
    write_tlv(&mut body, tags::context(1), &u64_to_der_integer(condition.cost()));
    if condition.is_compound() {
        write_tlv(
            &mut body,
            tags::context(2),
            &condition.subtypes().to_bit_string(),
        );
    }
    encode_tlv(tags::context_constructed(condition.kind().id()), &body)
}

/// Encode a fulfillment.
pub fn write_fulfillment(fulfillment: &Fulfillment) -> Vec<u8> {
    let mut body = Vec::new();
    match fulfillment {
        Fulfillment::PreimageSha256(f) => {
            write_tlv(&mut body, tags::context(0), f.preimage());
        }
        Fulfillment::PrefixSha256(f) => {
            write_tlv(&mut body, tags::context(0), f.prefix());
            write_tlv(
                &mut body,
                tags::context(1),
                &u64_to_der_integer(f.max_message_length()),
            );
            write_tlv(
                &mut body,
                tags::context_constructed(2),
                &write_fulfillment(f.subfulfillment()),
            );
        }
        Fulfillment::ThresholdSha256(f) => {
            let subfulfillments: Vec<u8> =
                f.subfulfillments().iter().flat_map(write_fulfillment).collect();
            let subconditions: Vec<u8> =
                f.subconditions().iter().flat_map(write_condition).collect();
            write_tlv(&mut body, tags::context_constructed(0), &subfulfillments);
            write_tlv(&mut body, tags::context_constructed(1), &subconditions);
        }
        Fulfillment::RsaSha256(f) => {
            write_tlv(&mut body, tags::context(0), f.modulus());
            write_tlv(&mut body, tags::context(1), f.signature());
        }
        Fulfillment::Ed25519Sha256(f) => {
            write_tlv(&mut body, tags::context(0), f.public_key().as_bytes());
            write_tlv(&mut body, tags::context(1), f.signature().as_bytes());
        }
    }
    encode_tlv(tags::context_constructed(fulfillment.kind().id()), &body)
}

fn read_type_tag(tag: Tag) -> Result<ConditionType, DecodeError> {
    if !tag.is_context_specific() || !tag.is_constructed() {
        return Err(DecodeError::UnsupportedTag(tag.0));
    }
    ConditionType::from_id(tag.number()).ok_or(DecodeError::UnknownConditionType(tag.number()))
}

/// Tracks the members of a SET OF as they are read, requiring each encoding
/// to sort at or after the one before it.
struct SetOrder<'a> {
    encoded: &'a [u8],
    start: usize,
    previous: Option<&'a [u8]>,
}

impl<'a> SetOrder<'a> {
    fn new(encoded: &'a [u8]) -> Self {
        Self {
            encoded,
            start: 0,
            previous: None,
        }
    }

    /// Record the member ending where `remaining` bytes of the set are left.
    fn advance(&mut self, remaining: usize) -> Result<(), DecodeError> {
        let end = self.encoded.len() - remaining;
        let member = &self.encoded[self.start..end];
        if let Some(previous) = self.previous {
            if compare_encoded(previous, member) == Ordering::Greater {
                return Err(DecodeError::NonCanonicalSetOrder);
            }
        }
        self.previous = Some(member);
        self.start = end;
        Ok(())
    }
}

fn read_condition_from(reader: &mut DerReader<'_>) -> Result<Condition, DecodeError> {
    let (tag, value) = reader.read_tlv()?;
    let kind = read_type_tag(tag)?;
    let mut fields = reader.nested(value);

    let fingerprint = fields.expect(tags::context(0))?;
    let fingerprint =
        Fingerprint::try_from(fingerprint).map_err(|_| DecodeError::InvalidFieldLength {
            field: "fingerprint",
            expected: Fingerprint::LEN,
            actual: fingerprint.len(),
        })?;
    let cost = u64_from_der_integer(fields.expect(tags::context(1))?)?;
    let subtypes = if kind.is_compound() {
        ConditionTypeSet::from_bit_string(fields.expect(tags::context(2))?)?
    } else {
        ConditionTypeSet::EMPTY
    };
    fields.finish()?;

    Ok(Condition::new(kind, fingerprint, cost, subtypes)?)
}

fn read_fulfillment_from(
    reader: &mut DerReader<'_>,
    limits: &DecodeLimits,
    depth: usize,
) -> Result<Fulfillment, DecodeError> {
    let (tag, value) = reader.read_tlv()?;
    let kind = read_type_tag(tag)?;
    if kind.is_compound() && depth >= limits.max_depth {
        return Err(DecodeError::DepthExceeded(limits.max_depth));
    }
    let mut fields = reader.nested(value);

    let fulfillment: Fulfillment = match kind {
        ConditionType::PreimageSha256 => {
            let preimage = fields.expect(tags::context(0))?;
            PreimageFulfillment::new(Bytes::copy_from_slice(preimage)).into()
        }
        ConditionType::PrefixSha256 => {
            let prefix = fields.expect(tags::context(0))?;
            let max_message_length = u64_from_der_integer(fields.expect(tags::context(1))?)?;
            let encoded = fields.expect(tags::context_constructed(2))?;
            let mut inner = fields.nested(encoded);
            let subfulfillment = read_fulfillment_from(&mut inner, limits, depth + 1)?;
            inner.finish()?;
            PrefixFulfillment::new(
                Bytes::copy_from_slice(prefix),
                max_message_length,
                subfulfillment,
            )?
            .into()
        }
        ConditionType::ThresholdSha256 => {
            let encoded = fields.expect(tags::context_constructed(0))?;
            let mut subfulfillments = Vec::new();
            let mut set = fields.nested(encoded);
            let mut order = SetOrder::new(encoded);
            while !set.is_empty() {
                subfulfillments.push(read_fulfillment_from(&mut set, limits, depth + 1)?);
                order.advance(set.remaining())?;
            }

            let encoded = fields.expect(tags::context_constructed(1))?;
            let mut subconditions = Vec::new();
            let mut set = fields.nested(encoded);
            let mut order = SetOrder::new(encoded);
            while !set.is_empty() {
                subconditions.push(read_condition_from(&mut set)?);
                order.advance(set.remaining())?;
            }

            ThresholdFulfillment::new(subfulfillments.len(), subfulfillments, subconditions)?
                .into()
        }
        ConditionType::RsaSha256 => {
            let modulus = fields.expect(tags::context(0))?;
            if modulus.first() == Some(&0) {
                return Err(DecodeError::NonCanonicalInteger);
            }
            let signature = fields.expect(tags::context(1))?;
            RsaFulfillment::new(
                Bytes::copy_from_slice(modulus),
                Bytes::copy_from_slice(signature),
            )?
            .into()
        }
        ConditionType::Ed25519Sha256 => {
            let public_key = fields.expect(tags::context(0))?;
            let signature = fields.expect(tags::context(1))?;
            Ed25519Fulfillment::from_slices(public_key, signature)?.into()
        }
    };
    fields.finish()?;
    Ok(fulfillment)
}
