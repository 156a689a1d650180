//! # Crypto-Conditions Testkit
//!
//! Testing utilities for crypto-conditions.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Byte-exact encodings for every condition type
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic keys and sample fulfillments
//!
//! ## Golden Vectors
//!
//! ```rust
//! use cryptoconditions_core::Fulfillment;
//! use cryptoconditions_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     let bytes = vector.fulfillment_bytes().unwrap();
//!     let fulfillment = Fulfillment::from_bytes(&bytes).unwrap();
//!     assert_eq!(fulfillment.condition().to_bytes(), vector.condition_bytes().unwrap());
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use cryptoconditions_testkit::generators::ThresholdParams;
//!
//! proptest! {
//!     #[test]
//!     fn order_does_not_matter(params: ThresholdParams) {
//!         prop_assert_eq!(params.build(), params.reversed().build());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{keypair, multi_party_keypairs, rsa_keypair};
pub use generators::{fulfillment, ThresholdParams};
pub use vectors::{all_vectors, fingerprint_contents, GoldenVector};
