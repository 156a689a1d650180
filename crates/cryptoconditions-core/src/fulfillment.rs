//! Fulfillments: the data that discharges a condition.
//!
//! Each variant derives its condition exactly once, inside its constructor,
//! and stores it. After construction a fulfillment is never mutated, so it
//! can be shared across threads freely.

use bytes::Bytes;

use crate::condition::{Condition, RSA_MAX_MODULUS_LEN, RSA_MIN_MODULUS_LEN};
use crate::codec::{read_fulfillment, write_fulfillment};
use crate::crypto::{rsa_pss_verify, Ed25519PublicKey, Ed25519Signature, Keypair, RsaKeypair};
use crate::error::{ConstructionError, DecodeError, VerifyError};
use crate::types::ConditionType;
use crate::uint::strip_leading_zeros;

/// A fulfillment of any of the five condition types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fulfillment {
    PreimageSha256(PreimageFulfillment),
    PrefixSha256(PrefixFulfillment),
    ThresholdSha256(ThresholdFulfillment),
    RsaSha256(RsaFulfillment),
    Ed25519Sha256(Ed25519Fulfillment),
}

impl Fulfillment {
    /// Decode a fulfillment with default limits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        read_fulfillment(bytes)
    }

    /// The condition type this fulfillment satisfies.
    pub fn kind(&self) -> ConditionType {
        match self {
            Fulfillment::PreimageSha256(_) => ConditionType::PreimageSha256,
            Fulfillment::PrefixSha256(_) => ConditionType::PrefixSha256,
            Fulfillment::ThresholdSha256(_) => ConditionType::ThresholdSha256,
            Fulfillment::RsaSha256(_) => ConditionType::RsaSha256,
            Fulfillment::Ed25519Sha256(_) => ConditionType::Ed25519Sha256,
        }
    }

    /// The derived condition, computed at construction.
    pub fn condition(&self) -> &Condition {
        match self {
            Fulfillment::PreimageSha256(f) => &f.condition,
            Fulfillment::PrefixSha256(f) => &f.condition,
            Fulfillment::ThresholdSha256(f) => &f.condition,
            Fulfillment::RsaSha256(f) => &f.condition,
            Fulfillment::Ed25519Sha256(f) => &f.condition,
        }
    }

    /// Cost of the derived condition.
    pub fn cost(&self) -> u64 {
        self.condition().cost()
    }

    /// Check this fulfillment against a condition and message.
    ///
    /// `Ok(false)` means the fulfillment is well formed but does not satisfy
    /// the condition. Errors are reserved for caller contract violations and
    /// unusable key material.
    pub fn verify(&self, condition: &Condition, message: &[u8]) -> Result<bool, VerifyError> {
        match self {
            Fulfillment::PreimageSha256(f) => Ok(f.verify(condition)),
            Fulfillment::PrefixSha256(f) => f.verify(condition, message),
            Fulfillment::ThresholdSha256(f) => f.verify(condition, message),
            Fulfillment::RsaSha256(f) => f.verify(condition, message),
            Fulfillment::Ed25519Sha256(f) => f.verify(condition, message),
        }
    }

    /// Canonical binary encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        write_fulfillment(self)
    }
}

impl From<PreimageFulfillment> for Fulfillment {
    fn from(f: PreimageFulfillment) -> Self {
        Fulfillment::PreimageSha256(f)
    }
}

impl From<PrefixFulfillment> for Fulfillment {
    fn from(f: PrefixFulfillment) -> Self {
        Fulfillment::PrefixSha256(f)
    }
}

impl From<ThresholdFulfillment> for Fulfillment {
    fn from(f: ThresholdFulfillment) -> Self {
        Fulfillment::ThresholdSha256(f)
    }
}

impl From<RsaFulfillment> for Fulfillment {
    fn from(f: RsaFulfillment) -> Self {
        Fulfillment::RsaSha256(f)
    }
}

impl From<Ed25519Fulfillment> for Fulfillment {
    fn from(f: Ed25519Fulfillment) -> Self {
        Fulfillment::Ed25519Sha256(f)
    }
}

/// PREIMAGE-SHA-256: reveal the preimage of a hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreimageFulfillment {
    preimage: Bytes,
    condition: Condition,
}

impl PreimageFulfillment {
    /// Wrap a preimage and derive its condition.
    pub fn new(preimage: impl Into<Bytes>) -> Self {
        let preimage = preimage.into();
        let condition = Condition::preimage_sha256(&preimage);
        Self {
            preimage,
            condition,
        }
    }

    /// The revealed preimage.
    pub fn preimage(&self) -> &[u8] {
        &self.preimage
    }

    /// The derived condition.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    // The message plays no part in a preimage check.
    fn verify(&self, condition: &Condition) -> bool {
        &self.condition == condition
    }
}

/// PREFIX-SHA-256: prepend a fixed prefix to the message before handing it
/// to the subfulfillment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrefixFulfillment {
    prefix: Bytes,
    max_message_length: u64,
    subfulfillment: Box<Fulfillment>,
    condition: Condition,
}

impl PrefixFulfillment {
    /// Wrap a subfulfillment behind a prefix and a message length limit.
    pub fn new(
        prefix: impl Into<Bytes>,
        max_message_length: u64,
        subfulfillment: Fulfillment,
    ) -> Result<Self, ConstructionError> {
        let prefix = prefix.into();
        let condition =
            Condition::prefix_sha256(&prefix, max_message_length, subfulfillment.condition())?;
        Ok(Self {
            prefix,
            max_message_length,
            subfulfillment: Box::new(subfulfillment),
            condition,
        })
    }

    /// Bytes prepended to every message.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Longest message this fulfillment accepts.
    pub fn max_message_length(&self) -> u64 {
        self.max_message_length
    }

    /// The wrapped fulfillment.
    pub fn subfulfillment(&self) -> &Fulfillment {
        &self.subfulfillment
    }

    /// The derived condition.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    fn verify(&self, condition: &Condition, message: &[u8]) -> Result<bool, VerifyError> {
        if message.len() as u64 > self.max_message_length {
            return Err(VerifyError::MessageTooLong {
                length: message.len(),
                max: self.max_message_length,
            });
        }
        if &self.condition != condition {
            return Ok(false);
        }

        let mut prefixed = Vec::with_capacity(self.prefix.len() + message.len());
        prefixed.extend_from_slice(&self.prefix);
        prefixed.extend_from_slice(message);
        self.subfulfillment
            .verify(self.subfulfillment.condition(), &prefixed)
    }
}

/// THRESHOLD-SHA-256: `threshold` of the branches must be fulfilled.
///
/// Holds exactly `threshold` subfulfillments; every other branch is carried
/// as a bare condition. Both lists are kept in ascending order of their
/// encodings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThresholdFulfillment {
    threshold: usize,
    subfulfillments: Vec<Fulfillment>,
    subconditions: Vec<Condition>,
    condition: Condition,
}

impl ThresholdFulfillment {
    /// Build a threshold fulfillment.
    ///
    /// The encoding carries the threshold as the number of subfulfillments,
    /// so exactly `threshold` must be supplied. Branches left unfulfilled go
    /// in `subconditions`.
    pub fn new(
        threshold: usize,
        mut subfulfillments: Vec<Fulfillment>,
        mut subconditions: Vec<Condition>,
    ) -> Result<Self, ConstructionError> {
        if threshold == 0 {
            return Err(ConstructionError::ZeroThreshold);
        }
        if threshold > subfulfillments.len() {
            return Err(ConstructionError::ThresholdTooLarge {
                threshold,
                available: subfulfillments.len(),
            });
        }
        if subfulfillments.len() > threshold {
            return Err(ConstructionError::SurplusSubfulfillments {
                threshold,
                supplied: subfulfillments.len(),
            });
        }

        subfulfillments.sort_by_cached_key(Fulfillment::to_bytes);
        subconditions.sort_by_cached_key(Condition::to_bytes);

        let branches: Vec<Condition> = subfulfillments
            .iter()
            .map(|f| f.condition().clone())
            .chain(subconditions.iter().cloned())
            .collect();
        let condition = Condition::threshold_sha256(threshold, &branches)?;

        Ok(Self {
            threshold,
            subfulfillments,
            subconditions,
            condition,
        })
    }

    /// Number of branches that must verify.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Fulfilled branches, in canonical order.
    pub fn subfulfillments(&self) -> &[Fulfillment] {
        &self.subfulfillments
    }

    /// Unfulfilled branches, in canonical order.
    pub fn subconditions(&self) -> &[Condition] {
        &self.subconditions
    }

    /// The derived condition.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    fn verify(&self, condition: &Condition, message: &[u8]) -> Result<bool, VerifyError> {
        if &self.condition != condition {
            return Ok(false);
        }

        let mut satisfied = 0usize;
        for sub in &self.subfulfillments {
            if sub.verify(sub.condition(), message)? {
                satisfied += 1;
            }
        }
        Ok(satisfied >= self.threshold)
    }
}

/// RSA-SHA-256: an RSA-PSS signature under a public modulus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RsaFulfillment {
    modulus: Bytes,
    signature: Bytes,
    condition: Condition,
}

impl RsaFulfillment {
    /// Build from a modulus and signature.
    ///
    /// Leading zero bytes of the modulus are dropped; the signature must be
    /// exactly as long as the remaining modulus.
    pub fn new(
        modulus: impl Into<Bytes>,
        signature: impl Into<Bytes>,
    ) -> Result<Self, ConstructionError> {
        let modulus = modulus.into();
        let stripped = strip_leading_zeros(&modulus).len();
        let modulus = modulus.slice(modulus.len() - stripped..);
        let signature = signature.into();

        if !(RSA_MIN_MODULUS_LEN..=RSA_MAX_MODULUS_LEN).contains(&modulus.len()) {
            return Err(ConstructionError::InvalidModulusLength(modulus.len()));
        }
        if signature.len() != modulus.len() {
            return Err(ConstructionError::InvalidSignatureLength {
                scheme: "rsa",
                expected: modulus.len(),
                actual: signature.len(),
            });
        }

        let condition = Condition::rsa_sha256(&modulus)?;
        Ok(Self {
            modulus,
            signature,
            condition,
        })
    }

    /// Sign `message` and wrap the signature.
    pub fn sign(keypair: &RsaKeypair, message: &[u8]) -> Result<Self, ConstructionError> {
        Self::new(keypair.modulus(), keypair.sign(message))
    }

    /// Public modulus, without leading zeros.
    pub fn modulus(&self) -> &[u8] {
        &self.modulus
    }

    /// RSA-PSS signature, as long as the modulus.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The derived condition.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    fn verify(&self, condition: &Condition, message: &[u8]) -> Result<bool, VerifyError> {
        if &self.condition != condition {
            return Ok(false);
        }
        rsa_pss_verify(&self.modulus, message, &self.signature)
    }
}

/// ED25519-SHA-256: an Ed25519 signature under a public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ed25519Fulfillment {
    public_key: Ed25519PublicKey,
    signature: Ed25519Signature,
    condition: Condition,
}

impl Ed25519Fulfillment {
    /// Pair a public key with a signature.
    pub fn new(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        let condition = Condition::ed25519_sha256(&public_key);
        Self {
            public_key,
            signature,
            condition,
        }
    }

    /// Build from raw slices, checking their fixed sizes.
    pub fn from_slices(public_key: &[u8], signature: &[u8]) -> Result<Self, ConstructionError> {
        let public_key: [u8; 32] = public_key
            .try_into()
            .map_err(|_| ConstructionError::InvalidPublicKeyLength(public_key.len()))?;
        let signature: [u8; 64] =
            signature
                .try_into()
                .map_err(|_| ConstructionError::InvalidSignatureLength {
                    scheme: "ed25519",
                    expected: 64,
                    actual: signature.len(),
                })?;
        Ok(Self::new(
            Ed25519PublicKey::from_bytes(public_key),
            Ed25519Signature::from_bytes(signature),
        ))
    }

    /// Sign `message` and wrap the signature.
    pub fn sign(keypair: &Keypair, message: &[u8]) -> Self {
        Self::new(keypair.public_key(), keypair.sign(message))
    }

    /// Signer's public key.
    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public_key
    }

    /// Signature over the message.
    pub fn signature(&self) -> &Ed25519Signature {
        &self.signature
    }

    /// The derived condition.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    fn verify(&self, condition: &Condition, message: &[u8]) -> Result<bool, VerifyError> {
        if &self.condition != condition {
            return Ok(false);
        }
        self.public_key.verify(message, &self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::sync::Arc;
    use std::thread;

    const ROADS: &[u8] = b"Roads? Where we're going, we don't need roads.";

    fn preimage(data: &'static [u8]) -> Fulfillment {
        PreimageFulfillment::new(data).into()
    }

    fn ying_yang() -> Fulfillment {
        let keypair = Keypair::from_seed(&[0x07; 32]);
        let inner = Ed25519Fulfillment::sign(&keypair, b"Ying Yang");
        PrefixFulfillment::new(&b"Ying "[..], 100, inner.into())
            .unwrap()
            .into()
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_preimage_verifies_any_message() {
        let fulfillment = preimage(ROADS);
        let condition = fulfillment.condition().clone();
        assert_eq!(condition.cost(), 46);
        assert!(fulfillment.verify(&condition, b"").unwrap());
        assert!(fulfillment.verify(&condition, b"anything at all").unwrap());

        let other = Condition::preimage_sha256(b"other");
        assert!(!fulfillment.verify(&other, b"").unwrap());
    }

    #[test]
    fn test_prefix_message_composition() {
        let fulfillment = ying_yang();
        let condition = fulfillment.condition().clone();
        assert!(fulfillment.verify(&condition, b"Yang").unwrap());

        // Wrong message.
        assert!(!fulfillment.verify(&condition, b"Yin").unwrap());

        // Wrong prefix, same inner signature.
        let keypair = Keypair::from_seed(&[0x07; 32]);
        let inner = Ed25519Fulfillment::sign(&keypair, b"Ying Yang");
        let reprefixed: Fulfillment = PrefixFulfillment::new(&b"Yin "[..], 100, inner.into())
            .unwrap()
            .into();
        assert!(!reprefixed
            .verify(reprefixed.condition(), b"Yang")
            .unwrap());
    }

    #[test]
    fn test_prefix_rejects_long_message() {
        let keypair = Keypair::from_seed(&[0x07; 32]);
        let inner = Ed25519Fulfillment::sign(&keypair, b"Ying Yang");
        let fulfillment: Fulfillment = PrefixFulfillment::new(&b"Ying "[..], 3, inner.into())
            .unwrap()
            .into();
        assert_eq!(
            fulfillment.verify(fulfillment.condition(), b"Yang"),
            Err(VerifyError::MessageTooLong { length: 4, max: 3 })
        );
    }

    #[test]
    fn test_prefix_subtypes() {
        let condition = ying_yang().condition().clone();
        assert_eq!(condition.kind(), ConditionType::PrefixSha256);
        assert_eq!(
            condition.subtypes().iter().collect::<Vec<_>>(),
            vec![ConditionType::Ed25519Sha256]
        );
        assert_eq!(condition.cost(), 5 + 100 + 131_072 + 1024);
    }

    #[test]
    fn test_threshold_two_of_three() {
        let rsa = Condition::rsa_sha256(&[0xc3; 256]).unwrap();
        let fulfillment: Fulfillment =
            ThresholdFulfillment::new(2, vec![preimage(ROADS), ying_yang()], vec![rsa.clone()])
                .unwrap()
                .into();
        let condition = fulfillment.condition().clone();
        assert!(fulfillment.verify(&condition, b"Yang").unwrap());

        // The prefix branch signs for "Yang" only.
        assert!(!fulfillment.verify(&condition, b"Ying").unwrap());

        // One branch fulfilled against a 2-of-3 condition.
        let one: Fulfillment = ThresholdFulfillment::new(
            1,
            vec![preimage(ROADS)],
            vec![ying_yang().condition().clone(), rsa],
        )
        .unwrap()
        .into();
        assert!(!one.verify(&condition, b"Yang").unwrap());
    }

    #[test]
    fn test_threshold_with_invalid_branch_fails() {
        let keypair = Keypair::from_seed(&[0x05; 32]);
        let bad_signature = Ed25519Fulfillment::new(keypair.public_key(), keypair.sign(b"other"));
        let branches = vec![preimage(b"a"), bad_signature.into()];
        let fulfillment: Fulfillment = ThresholdFulfillment::new(2, branches, vec![])
            .unwrap()
            .into();
        assert!(!fulfillment
            .verify(fulfillment.condition(), b"message")
            .unwrap());
    }

    #[test]
    fn test_threshold_rejects_bad_threshold() {
        assert_eq!(
            ThresholdFulfillment::new(0, vec![preimage(b"a")], vec![]),
            Err(ConstructionError::ZeroThreshold)
        );
        assert_eq!(
            ThresholdFulfillment::new(
                2,
                vec![preimage(b"a")],
                vec![Condition::preimage_sha256(b"b")]
            ),
            Err(ConstructionError::ThresholdTooLarge {
                threshold: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_threshold_rejects_surplus_subfulfillments() {
        let rsa = RsaKeypair::generate(1024).unwrap();
        let keypair = Keypair::from_seed(&[0x09; 32]);
        let wrong_message: Fulfillment = RsaFulfillment::sign(&rsa, b"other").unwrap().into();
        let signed: Fulfillment = Ed25519Fulfillment::sign(&keypair, b"msg").into();
        let revealed = preimage(b"open");

        assert_eq!(
            ThresholdFulfillment::new(
                2,
                vec![wrong_message.clone(), signed.clone(), revealed.clone()],
                vec![]
            ),
            Err(ConstructionError::SurplusSubfulfillments {
                threshold: 2,
                supplied: 3
            })
        );

        // The caller picks which branches to prove; the cheap invalid one
        // cannot crowd out the valid ones.
        let chosen: Fulfillment = ThresholdFulfillment::new(
            2,
            vec![signed, revealed],
            vec![wrong_message.condition().clone()],
        )
        .unwrap()
        .into();
        assert!(chosen.verify(chosen.condition(), b"msg").unwrap());
    }

    #[test]
    fn test_threshold_permutation_stability() {
        let a = preimage(b"alpha");
        let b = ying_yang();
        let c = Condition::preimage_sha256(b"gamma");
        let d = Condition::rsa_sha256(&[0xc3; 128]).unwrap();

        let first: Fulfillment =
            ThresholdFulfillment::new(2, vec![a.clone(), b.clone()], vec![c.clone(), d.clone()])
                .unwrap()
                .into();
        let second: Fulfillment = ThresholdFulfillment::new(2, vec![b, a], vec![d, c])
            .unwrap()
            .into();
        assert_eq!(first.to_bytes(), second.to_bytes());
        assert_eq!(first.condition(), second.condition());
    }

    #[test]
    fn test_ed25519_signature_length() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let pk = keypair.public_key();
        for len in [0usize, 32, 63, 65, 128] {
            assert_eq!(
                Ed25519Fulfillment::from_slices(pk.as_bytes(), &vec![0u8; len]),
                Err(ConstructionError::InvalidSignatureLength {
                    scheme: "ed25519",
                    expected: 64,
                    actual: len
                })
            );
        }
        assert_eq!(
            Ed25519Fulfillment::from_slices(&[0u8; 31], &[0u8; 64]),
            Err(ConstructionError::InvalidPublicKeyLength(31))
        );
        assert!(Ed25519Fulfillment::from_slices(pk.as_bytes(), &[0u8; 64]).is_ok());
    }

    #[test]
    fn test_ed25519_verify() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let fulfillment: Fulfillment = Ed25519Fulfillment::sign(&keypair, b"hello").into();
        let condition = fulfillment.condition().clone();
        assert!(fulfillment.verify(&condition, b"hello").unwrap());
        assert!(!fulfillment.verify(&condition, b"hellO").unwrap());

        let other = Keypair::from_seed(&[0x43; 32]);
        let other_condition = Condition::ed25519_sha256(&other.public_key());
        assert!(!fulfillment.verify(&other_condition, b"hello").unwrap());
    }

    #[test]
    fn test_rsa_signature_length_must_match_modulus() {
        assert_eq!(
            RsaFulfillment::new(vec![0xc3; 128], vec![0u8; 127]),
            Err(ConstructionError::InvalidSignatureLength {
                scheme: "rsa",
                expected: 128,
                actual: 127
            })
        );
        assert_eq!(
            RsaFulfillment::new(vec![0xc3; 64], vec![0u8; 64]),
            Err(ConstructionError::InvalidModulusLength(64))
        );

        let mut padded = vec![0x00, 0x00];
        padded.extend_from_slice(&[0xc3; 128]);
        let rsa = RsaFulfillment::new(padded, vec![0u8; 128]).unwrap();
        assert_eq!(rsa.modulus().len(), 128);
    }

    #[test]
    fn test_rsa_sign_verify() {
        let keypair = RsaKeypair::generate(1024).unwrap();
        let fulfillment: Fulfillment = RsaFulfillment::sign(&keypair, b"payload").unwrap().into();
        let condition = fulfillment.condition().clone();
        assert_eq!(condition.cost(), 128 * 128);
        assert!(fulfillment.verify(&condition, b"payload").unwrap());
        assert!(!fulfillment.verify(&condition, b"payloaD").unwrap());
    }

    #[test]
    fn test_equality_and_hash() {
        let a = ying_yang();
        let b = ying_yang();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_eq!(a.condition(), b.condition());
        assert_eq!(hash_of(a.condition()), hash_of(b.condition()));

        let c = preimage(b"different");
        assert_ne!(a, c);
        assert_ne!(a.condition(), c.condition());
    }

    #[test]
    fn test_concurrent_construction_is_deterministic() {
        let expected = ThresholdFulfillment::new(2, vec![preimage(ROADS), ying_yang()], vec![])
            .unwrap()
            .condition()
            .clone();
        let expected = Arc::new(expected);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let expected = Arc::clone(&expected);
                thread::spawn(move || {
                    let built =
                        ThresholdFulfillment::new(2, vec![ying_yang(), preimage(ROADS)], vec![])
                            .unwrap();
                    assert_eq!(built.condition(), expected.as_ref());
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
