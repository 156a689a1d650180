//! Error types for crypto-condition operations.

use thiserror::Error;

use crate::types::ConditionType;

/// Structural errors raised while decoding DER bytes.
///
/// These are always surfaced to the caller. Malformed input is never truncated
/// or repaired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unsupported tag 0x{0:02x}")]
    UnsupportedTag(u8),

    #[error("unexpected tag: expected 0x{expected:02x}, got 0x{actual:02x}")]
    UnexpectedTag { expected: u8, actual: u8 },

    #[error("indefinite length encoding is not allowed")]
    IndefiniteLength,

    #[error("length is not minimally encoded")]
    NonMinimalLength,

    #[error("declared length [{declared}] is larger than allowed [{max}]")]
    LengthTooLarge { declared: u64, max: usize },

    #[error("declared length [{declared}] exceeds remaining input [{remaining}]")]
    LengthExceedsInput { declared: u64, remaining: usize },

    #[error("integer is not canonically encoded")]
    NonCanonicalInteger,

    #[error("integer does not fit in 64 bits")]
    IntegerOverflow,

    #[error("bit string is not canonically encoded")]
    NonCanonicalBitString,

    #[error("set members are not in canonical order")]
    NonCanonicalSetOrder,

    #[error("invalid {field} length: expected {expected}, got {actual}")]
    InvalidFieldLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown condition type: {0}")]
    UnknownConditionType(u8),

    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    #[error("nesting depth exceeds maximum of {0}")]
    DepthExceeded(usize),

    #[error("invalid structure: {0}")]
    Construction(#[from] ConstructionError),
}

/// Contract violations detected while constructing a condition or fulfillment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("ed25519 public key must be 32 bytes, got {0}")]
    InvalidPublicKeyLength(usize),

    #[error("{scheme} signature must be {expected} bytes, got {actual}")]
    InvalidSignatureLength {
        scheme: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("rsa modulus must be between 128 and 512 bytes, got {0}")]
    InvalidModulusLength(usize),

    #[error("threshold must be at least 1")]
    ZeroThreshold,

    #[error("threshold {threshold} exceeds the {available} available branches")]
    ThresholdTooLarge { threshold: usize, available: usize },

    #[error("threshold {threshold} takes exactly {threshold} subfulfillments, got {supplied}")]
    SurplusSubfulfillments { threshold: usize, supplied: usize },

    #[error("{kind} is not a compound condition and cannot carry subtypes")]
    UnexpectedSubtypes { kind: ConditionType },

    #[error("{kind} condition lists its own type among its subtypes")]
    OwnTypeInSubtypes { kind: ConditionType },

    #[error("cost overflows 64 bits")]
    CostOverflow,
}

/// Errors raised while verifying a fulfillment.
///
/// A fulfillment that simply does not satisfy a condition is not an error;
/// `verify` returns `Ok(false)` for that case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("message length ({length}) exceeds maximum message length ({max})")]
    MessageTooLong { length: usize, max: u64 },

    #[error("invalid ed25519 public key")]
    InvalidPublicKey,

    #[error("invalid rsa public key: {0}")]
    InvalidRsaKey(String),
}

/// Error returned when parsing an unknown condition type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown condition type name: {0}")]
pub struct UnknownTypeName(pub String);
