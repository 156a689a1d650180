//! # Crypto-Conditions Core
//!
//! Pure primitives for crypto-conditions: conditions, fulfillments, and their
//! canonical DER encoding.
//!
//! This crate contains no I/O and no logging. Every operation is a
//! synchronous function over immutable values.
//!
//! ## Key Types
//!
//! - [`Condition`] - Fixed-size commitment: type, fingerprint, cost, subtypes
//! - [`Fulfillment`] - Proof that discharges a condition
//! - [`ConditionType`] - The five registered types
//! - [`Fingerprint`] - SHA-256 digest of a type-specific structure
//!
//! ## Encoding
//!
//! Conditions and fulfillments are encoded in a strict DER subset. See the
//! [`codec`] module for the reader and writer, and [`der`] for the primitive
//! tag-length-value layer.

pub mod canonical;
pub mod codec;
pub mod condition;
pub mod crypto;
pub mod der;
pub mod error;
pub mod fulfillment;
pub mod types;
pub mod uint;

pub use canonical::compare_encoded;
pub use codec::{
    read_condition, read_condition_with, read_fulfillment, read_fulfillment_with,
    write_condition, write_fulfillment, DecodeLimits,
};
pub use condition::Condition;
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair, RsaKeypair};
pub use error::{ConstructionError, DecodeError, UnknownTypeName, VerifyError};
pub use fulfillment::{
    Ed25519Fulfillment, Fulfillment, PrefixFulfillment, PreimageFulfillment, RsaFulfillment,
    ThresholdFulfillment,
};
pub use types::{ConditionType, ConditionTypeSet, Fingerprint};
