//! Golden test vectors for byte-exact interoperability.
//!
//! The vectors live in `vectors/golden.json` and are embedded at compile
//! time. Every implementation must decode each fulfillment, re-encode it to
//! the same bytes, and derive the same condition.

use serde::{Deserialize, Serialize};

use cryptoconditions_core::canonical::{
    ed25519_fingerprint_contents, prefix_fingerprint_contents, rsa_fingerprint_contents,
    threshold_fingerprint_contents,
};
use cryptoconditions_core::{Condition, Fulfillment};

const GOLDEN_JSON: &str = include_str!("../vectors/golden.json");

/// The vector file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenFile {
    pub version: String,
    pub description: String,
    pub vectors: Vec<GoldenVector>,
}

/// A single golden vector. Byte fields are hex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub message: String,
    pub fulfillment: String,
    pub condition_binary: String,
    pub fingerprint_contents: String,
    pub fingerprint: String,
    pub cost: u64,
    pub subtypes: Vec<String>,
}

impl GoldenVector {
    pub fn message_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(&self.message)
    }

    pub fn fulfillment_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(&self.fulfillment)
    }

    pub fn condition_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(&self.condition_binary)
    }

    pub fn fingerprint_contents_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(&self.fingerprint_contents)
    }
}

/// Parse the embedded vector file.
pub fn load_golden_file() -> serde_json::Result<GoldenFile> {
    serde_json::from_str(GOLDEN_JSON)
}

/// Get all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    load_golden_file()
        .expect("embedded golden.json is valid")
        .vectors
}

/// Find a vector by name.
pub fn vector(name: &str) -> Option<GoldenVector> {
    all_vectors().into_iter().find(|v| v.name == name)
}

/// Reconstruct the bytes a fulfillment's fingerprint commits to.
pub fn fingerprint_contents(fulfillment: &Fulfillment) -> Vec<u8> {
    match fulfillment {
        Fulfillment::PreimageSha256(f) => f.preimage().to_vec(),
        Fulfillment::PrefixSha256(f) => prefix_fingerprint_contents(
            f.prefix(),
            f.max_message_length(),
            f.subfulfillment().condition(),
        ),
        Fulfillment::ThresholdSha256(f) => {
            let branches: Vec<Condition> = f
                .subfulfillments()
                .iter()
                .map(|s| s.condition().clone())
                .chain(f.subconditions().iter().cloned())
                .collect();
            threshold_fingerprint_contents(f.threshold() as u64, &branches)
        }
        Fulfillment::RsaSha256(f) => rsa_fingerprint_contents(f.modulus()),
        Fulfillment::Ed25519Sha256(f) => ed25519_fingerprint_contents(f.public_key().as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_golden_file_parses() {
        let file = load_golden_file().unwrap();
        assert_eq!(file.version, "1");
        assert!(file.vectors.len() >= 8);
    }

    #[test]
    fn test_vector_names_are_unique() {
        let vectors = all_vectors();
        let mut names: Vec<_> = vectors.iter().map(|v| v.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), vectors.len());
    }

    #[test]
    fn test_every_type_is_covered() {
        let vectors = all_vectors();
        for name in [
            "preimage-sha-256",
            "prefix-sha-256",
            "threshold-sha-256",
            "rsa-sha-256",
            "ed25519-sha-256",
        ] {
            assert!(
                vectors.iter().any(|v| v.type_name == name),
                "no vector for {}",
                name
            );
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let v = vector("ed25519_hello").unwrap();
        assert_eq!(v.message_bytes().unwrap(), b"hello");
        assert!(vector("missing").is_none());
    }
}
