//! Condition: a fixed-size, publicly shareable commitment.
//!
//! A condition holds a type, a cost bound, a SHA-256 fingerprint, and for
//! compound types the set of types nested beneath it. Conditions are pure
//! values: two conditions are equal iff their canonical encodings are equal,
//! and they are ordered by those encodings.

use std::cmp::Ordering;
use std::fmt;

use crate::canonical::{
    compare_encoded, ed25519_fingerprint_contents, prefix_cost, prefix_fingerprint_contents,
    rsa_cost, rsa_fingerprint_contents, threshold_cost, threshold_fingerprint_contents,
    ED25519_COST,
};
use crate::codec::{read_condition, write_condition};
use crate::crypto::{sha256, Ed25519PublicKey};
use crate::error::{ConstructionError, DecodeError};
use crate::types::{ConditionType, ConditionTypeSet, Fingerprint};
use crate::uint::strip_leading_zeros;

/// Smallest accepted RSA modulus, in bytes.
pub const RSA_MIN_MODULUS_LEN: usize = 128;

/// Largest accepted RSA modulus, in bytes.
pub const RSA_MAX_MODULUS_LEN: usize = 512;

/// A crypto-condition.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    kind: ConditionType,
    fingerprint: Fingerprint,
    cost: u64,
    subtypes: ConditionTypeSet,
}

impl Condition {
    /// Create a condition of a simple (non-compound) type.
    pub fn simple(
        kind: ConditionType,
        fingerprint: Fingerprint,
        cost: u64,
    ) -> Result<Self, ConstructionError> {
        Self::new(kind, fingerprint, cost, ConditionTypeSet::EMPTY)
    }

    /// Create a condition from its parts.
    ///
    /// Simple types must have an empty subtype set, and a compound type
    /// never lists itself.
    pub fn new(
        kind: ConditionType,
        fingerprint: Fingerprint,
        cost: u64,
        subtypes: ConditionTypeSet,
    ) -> Result<Self, ConstructionError> {
        if !kind.is_compound() && !subtypes.is_empty() {
            return Err(ConstructionError::UnexpectedSubtypes { kind });
        }
        if subtypes.contains(kind) {
            return Err(ConstructionError::OwnTypeInSubtypes { kind });
        }
        Ok(Self {
            kind,
            fingerprint,
            cost,
            subtypes,
        })
    }

    /// PREIMAGE-SHA-256 condition for a preimage.
    pub fn preimage_sha256(preimage: &[u8]) -> Self {
        Self {
            kind: ConditionType::PreimageSha256,
            fingerprint: sha256(preimage),
            cost: preimage.len() as u64,
            subtypes: ConditionTypeSet::EMPTY,
        }
    }

    /// PREFIX-SHA-256 condition over a subcondition.
    pub fn prefix_sha256(
        prefix: &[u8],
        max_message_length: u64,
        subcondition: &Condition,
    ) -> Result<Self, ConstructionError> {
        let cost = prefix_cost(prefix.len(), max_message_length, subcondition.cost)
            .ok_or(ConstructionError::CostOverflow)?;
        let contents = prefix_fingerprint_contents(prefix, max_message_length, subcondition);
        Ok(Self {
            kind: ConditionType::PrefixSha256,
            fingerprint: sha256(&contents),
            cost,
            subtypes: compound_subtypes(ConditionType::PrefixSha256, [subcondition]),
        })
    }

    /// THRESHOLD-SHA-256 condition requiring `threshold` of `subconditions`.
    pub fn threshold_sha256(
        threshold: usize,
        subconditions: &[Condition],
    ) -> Result<Self, ConstructionError> {
        if threshold == 0 {
            return Err(ConstructionError::ZeroThreshold);
        }
        if threshold > subconditions.len() {
            return Err(ConstructionError::ThresholdTooLarge {
                threshold,
                available: subconditions.len(),
            });
        }
        let costs: Vec<u64> = subconditions.iter().map(|c| c.cost).collect();
        let cost = threshold_cost(threshold, &costs).ok_or(ConstructionError::CostOverflow)?;
        let contents = threshold_fingerprint_contents(threshold as u64, subconditions);
        Ok(Self {
            kind: ConditionType::ThresholdSha256,
            fingerprint: sha256(&contents),
            cost,
            subtypes: compound_subtypes(ConditionType::ThresholdSha256, subconditions),
        })
    }

    /// RSA-SHA-256 condition for a public modulus (unsigned big-endian).
    pub fn rsa_sha256(modulus: &[u8]) -> Result<Self, ConstructionError> {
        let modulus = strip_leading_zeros(modulus);
        if !(RSA_MIN_MODULUS_LEN..=RSA_MAX_MODULUS_LEN).contains(&modulus.len()) {
            return Err(ConstructionError::InvalidModulusLength(modulus.len()));
        }
        Ok(Self {
            kind: ConditionType::RsaSha256,
            fingerprint: sha256(&rsa_fingerprint_contents(modulus)),
            cost: rsa_cost(modulus.len()),
            subtypes: ConditionTypeSet::EMPTY,
        })
    }

    /// ED25519-SHA-256 condition for a public key.
    pub fn ed25519_sha256(public_key: &Ed25519PublicKey) -> Self {
        Self {
            kind: ConditionType::Ed25519Sha256,
            fingerprint: sha256(&ed25519_fingerprint_contents(public_key.as_bytes())),
            cost: ED25519_COST,
            subtypes: ConditionTypeSet::EMPTY,
        }
    }

    /// The condition type.
    pub fn kind(&self) -> ConditionType {
        self.kind
    }

    /// The fingerprint.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// The cost bound.
    pub fn cost(&self) -> u64 {
        self.cost
    }

    /// Types nested beneath this condition (empty for simple types).
    pub fn subtypes(&self) -> ConditionTypeSet {
        self.subtypes
    }

    /// Whether this is a compound condition.
    pub fn is_compound(&self) -> bool {
        self.kind.is_compound()
    }

    /// Decode a condition with default limits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        read_condition(bytes)
    }

    /// Canonical binary encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        write_condition(self)
    }
}

/// Union of `{branch.kind} ∪ branch.subtypes` over every branch, excluding
/// the compound type itself.
pub(crate) fn compound_subtypes<'a, I>(own: ConditionType, branches: I) -> ConditionTypeSet
where
    I: IntoIterator<Item = &'a Condition>,
{
    let mut set = ConditionTypeSet::EMPTY;
    for branch in branches {
        set.insert(branch.kind);
        set = set.union(&branch.subtypes);
    }
    set.remove(own);
    set
}

impl Ord for Condition {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_encoded(&self.to_bytes(), &other.to_bytes())
    }
}

impl PartialOrd for Condition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Condition");
        s.field("kind", &self.kind)
            .field("fingerprint", &self.fingerprint)
            .field("cost", &self.cost);
        if self.kind.is_compound() {
            s.field("subtypes", &self.subtypes);
        }
        s.finish()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.fingerprint, self.cost)
    }
}
