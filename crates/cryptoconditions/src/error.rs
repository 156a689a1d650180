//! Error types for the unified API.

use cryptoconditions_core::{ConditionType, ConstructionError, DecodeError, VerifyError};
use thiserror::Error;

/// Errors that can occur while decoding or verifying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed input bytes.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid condition or fulfillment fields.
    #[error("construction error: {0}")]
    Construction(#[from] ConstructionError),

    /// Caller contract violation or unusable key during verification.
    #[error("verify error: {0}")]
    Verify(#[from] VerifyError),

    /// Condition cost above the configured ceiling.
    #[error("condition cost {cost} exceeds maximum {max}")]
    CostExceeded { cost: u64, max: u64 },

    /// Condition type (or a nested subtype) is not allowed.
    #[error("condition type not allowed: {0}")]
    TypeNotAllowed(ConditionType),
}

/// Result type for crypto-condition operations.
pub type Result<T> = std::result::Result<T, Error>;
