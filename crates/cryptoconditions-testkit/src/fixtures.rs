//! Test fixtures and helpers.
//!
//! Deterministic keys and the sample fulfillments the golden vectors are
//! built from.

use std::sync::OnceLock;

use cryptoconditions_core::{
    Condition, Ed25519Fulfillment, Fulfillment, Keypair, PrefixFulfillment, PreimageFulfillment,
    RsaKeypair, ThresholdFulfillment,
};

/// PKCS#1 PEM of the 2048-bit RSA key behind the RSA golden vectors.
pub const RSA_2048_PEM: &str = include_str!("../vectors/rsa-2048.pem");

/// Preimage used across the sample fulfillments.
pub const ROADS: &[u8] = b"Roads? Where we're going, we don't need roads.";

/// Create a deterministic Ed25519 keypair from a repeated seed byte.
pub fn keypair(seed_byte: u8) -> Keypair {
    Keypair::from_seed(&[seed_byte; 32])
}

/// Create multiple keypairs for multi-party thresholds.
pub fn multi_party_keypairs(count: usize) -> Vec<Keypair> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[31] = 0xcc;
            Keypair::from_seed(&seed)
        })
        .collect()
}

/// The shared RSA-2048 key, parsed once.
pub fn rsa_keypair() -> &'static RsaKeypair {
    static KEY: OnceLock<RsaKeypair> = OnceLock::new();
    KEY.get_or_init(|| RsaKeypair::from_pkcs1_pem(RSA_2048_PEM).expect("embedded PEM is valid"))
}

/// A preimage fulfillment.
pub fn preimage(data: &[u8]) -> Fulfillment {
    PreimageFulfillment::new(data.to_vec()).into()
}

/// An Ed25519 fulfillment from a seeded key.
pub fn ed25519(seed_byte: u8, message: &[u8]) -> Fulfillment {
    Ed25519Fulfillment::sign(&keypair(seed_byte), message).into()
}

/// An RSA fulfillment signed with the shared key.
pub fn rsa(message: &[u8]) -> Fulfillment {
    cryptoconditions_core::RsaFulfillment::sign(rsa_keypair(), message)
        .expect("shared key has a valid modulus")
        .into()
}

/// The bare RSA condition for the shared key.
pub fn rsa_condition() -> Condition {
    Condition::rsa_sha256(&rsa_keypair().modulus()).expect("shared key has a valid modulus")
}

/// Prefix `"Ying "` over an Ed25519 signature of `"Ying Yang"`.
///
/// Verifies for the message `"Yang"`.
pub fn ying_yang() -> Fulfillment {
    PrefixFulfillment::new(b"Ying ".to_vec(), 100, ed25519(0x07, b"Ying Yang"))
        .expect("cost fits")
        .into()
}

/// 2-of-3: [`ROADS`] preimage and [`ying_yang`] fulfilled, the shared RSA
/// key as a bare branch. Verifies for the message `"Yang"`.
pub fn two_of_three() -> Fulfillment {
    ThresholdFulfillment::new(2, vec![preimage(ROADS), ying_yang()], vec![rsa_condition()])
        .expect("two subfulfillments")
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptoconditions_core::ConditionType;

    #[test]
    fn test_rsa_keypair_is_2048_bits() {
        assert_eq!(rsa_keypair().modulus().len(), 256);
        assert_eq!(rsa_condition().cost(), 65_536);
    }

    #[test]
    fn test_multi_party() {
        let parties = multi_party_keypairs(3);
        let pks: Vec<_> = parties.iter().map(|p| p.public_key()).collect();
        assert_ne!(pks[0], pks[1]);
        assert_ne!(pks[1], pks[2]);
        assert_ne!(pks[0], pks[2]);
    }

    #[test]
    fn test_sample_fulfillments_verify() {
        let yy = ying_yang();
        assert!(yy.verify(yy.condition(), b"Yang").unwrap());

        let threshold = two_of_three();
        assert_eq!(threshold.kind(), ConditionType::ThresholdSha256);
        assert_eq!(threshold.cost(), 200_809);
        assert!(threshold.verify(threshold.condition(), b"Yang").unwrap());

        let signed = rsa(b"fixture");
        assert!(signed.verify(&rsa_condition(), b"fixture").unwrap());
    }
}
