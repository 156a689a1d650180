//! # Crypto-Conditions
//!
//! Commit to a proof with a condition, discharge it with a fulfillment.
//!
//! ## Overview
//!
//! A **condition** is a small, fixed-size value that can be published: a
//! type, a SHA-256 fingerprint, a cost bound, and for compound types the set
//! of types nested beneath it. A **fulfillment** carries the data that proves
//! the condition: a preimage, a signature, or a tree of other fulfillments.
//!
//! Five types are supported:
//!
//! - **PREIMAGE-SHA-256**: reveal the preimage of a hash
//! - **PREFIX-SHA-256**: prepend a fixed prefix to the message, then recurse
//! - **THRESHOLD-SHA-256**: m-of-n over nested conditions
//! - **RSA-SHA-256**: RSA-PSS signature
//! - **ED25519-SHA-256**: Ed25519 signature
//!
//! ## Usage
//!
//! ```rust
//! use cryptoconditions::{Ed25519Fulfillment, Fulfillment, Keypair, Verifier};
//!
//! let keypair = Keypair::generate();
//! let fulfillment: Fulfillment = Ed25519Fulfillment::sign(&keypair, b"hello").into();
//!
//! // Publish the condition; keep the fulfillment until it is needed.
//! let condition = fulfillment.condition().to_bytes();
//!
//! let verifier = Verifier::default();
//! assert!(verifier
//!     .verify_encoded(&fulfillment.to_bytes(), &condition, b"hello")
//!     .unwrap());
//! ```
//!
//! ## Re-exports
//!
//! - `cryptoconditions::core` - The core crate (codec, types, primitives)

pub mod error;
pub mod verifier;

// Re-export the core crate
pub use cryptoconditions_core as core;

pub use error::{Error, Result};
pub use verifier::{Verifier, VerifierConfig, DEFAULT_MAX_COST};

// Re-export commonly used core types
pub use cryptoconditions_core::{
    read_condition, read_condition_with, read_fulfillment, read_fulfillment_with,
    write_condition, write_fulfillment, Condition, ConditionType, ConditionTypeSet,
    ConstructionError, DecodeError, DecodeLimits, Ed25519Fulfillment, Ed25519PublicKey,
    Ed25519Signature, Fingerprint, Fulfillment, Keypair, PrefixFulfillment,
    PreimageFulfillment, RsaFulfillment, RsaKeypair, ThresholdFulfillment, VerifyError,
};
