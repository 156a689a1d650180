//! Strong type definitions: the condition type registry, subtype sets, and
//! fingerprints.

use std::fmt;
use std::str::FromStr;

use crate::error::{DecodeError, UnknownTypeName};

/// The closed set of condition kinds.
///
/// The discriminant is the stable numeric id used as the codec tag selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ConditionType {
    /// SHA-256 hashlock.
    PreimageSha256 = 0,
    /// Prefix prepended to the message before a nested fulfillment is checked.
    PrefixSha256 = 1,
    /// m-of-n composition of nested conditions.
    ThresholdSha256 = 2,
    /// RSA-PSS signature with SHA-256.
    RsaSha256 = 3,
    /// Ed25519 signature.
    Ed25519Sha256 = 4,
}

impl ConditionType {
    /// Every registered type, in id order.
    pub const ALL: [ConditionType; 5] = [
        Self::PreimageSha256,
        Self::PrefixSha256,
        Self::ThresholdSha256,
        Self::RsaSha256,
        Self::Ed25519Sha256,
    ];

    /// The numeric type id.
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look up a type by numeric id.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::PreimageSha256),
            1 => Some(Self::PrefixSha256),
            2 => Some(Self::ThresholdSha256),
            3 => Some(Self::RsaSha256),
            4 => Some(Self::Ed25519Sha256),
            _ => None,
        }
    }

    /// The machine name, e.g. `preimage-sha-256`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PreimageSha256 => "preimage-sha-256",
            Self::PrefixSha256 => "prefix-sha-256",
            Self::ThresholdSha256 => "threshold-sha-256",
            Self::RsaSha256 => "rsa-sha-256",
            Self::Ed25519Sha256 => "ed25519-sha-256",
        }
    }

    /// Look up a type by machine name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Compound types embed other conditions and carry subtypes.
    pub const fn is_compound(self) -> bool {
        matches!(self, Self::PrefixSha256 | Self::ThresholdSha256)
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConditionType {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownTypeName(s.to_string()))
    }
}

/// A set of condition types, encoded on the wire as a DER BIT STRING where
/// bit `n` (counting from the most significant bit of the first byte) marks
/// type id `n`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ConditionTypeSet(u8);

impl ConditionTypeSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// A set containing every registered type.
    pub const fn all() -> Self {
        Self(0b1_1111)
    }

    /// Create an empty set.
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Add a type.
    pub fn insert(&mut self, kind: ConditionType) {
        self.0 |= 1 << kind.id();
    }

    /// Remove a type.
    pub fn remove(&mut self, kind: ConditionType) {
        self.0 &= !(1 << kind.id());
    }

    /// Whether the set contains `kind`.
    pub fn contains(&self, kind: ConditionType) -> bool {
        self.0 & (1 << kind.id()) != 0
    }

    /// Whether every member of `self` is in `other`.
    pub fn is_subset(&self, other: &ConditionTypeSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Union of two sets.
    pub fn union(&self, other: &ConditionTypeSet) -> ConditionTypeSet {
        Self(self.0 | other.0)
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in id order.
    pub fn iter(&self) -> impl Iterator<Item = ConditionType> + '_ {
        ConditionType::ALL
            .into_iter()
            .filter(move |t| self.contains(*t))
    }

    /// DER BIT STRING content: unused-bit count followed by the bits, with
    /// trailing zero bits trimmed.
    pub fn to_bit_string(&self) -> Vec<u8> {
        match self.iter().last() {
            None => vec![0x00],
            Some(highest) => {
                let mut bits = 0u8;
                for kind in self.iter() {
                    bits |= 0x80 >> kind.id();
                }
                vec![7 - highest.id(), bits]
            }
        }
    }

    /// Parse DER BIT STRING content, requiring the canonical form produced by
    /// [`ConditionTypeSet::to_bit_string`].
    pub fn from_bit_string(content: &[u8]) -> Result<Self, DecodeError> {
        let (&unused, bits) = content
            .split_first()
            .ok_or(DecodeError::NonCanonicalBitString)?;
        if unused > 7 || (bits.is_empty() && unused != 0) {
            return Err(DecodeError::NonCanonicalBitString);
        }

        let mut set = Self::EMPTY;
        for (byte_index, &byte) in bits.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let id = u8::try_from(byte_index * 8 + bit)
                    .map_err(|_| DecodeError::NonCanonicalBitString)?;
                let kind = ConditionType::from_id(id).ok_or(DecodeError::UnknownConditionType(id))?;
                set.insert(kind);
            }
        }

        if set.to_bit_string() != content {
            return Err(DecodeError::NonCanonicalBitString);
        }
        Ok(set)
    }
}

impl FromIterator<ConditionType> for ConditionTypeSet {
    fn from_iter<I: IntoIterator<Item = ConditionType>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl fmt::Debug for ConditionTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// A 32-byte SHA-256 fingerprint of a condition's fingerprint contents.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Length of a fingerprint in bytes.
    pub const LEN: usize = 32;

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != Self::LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Fingerprint {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Fingerprint {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = slice.try_into()?;
        Ok(Self(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_type_registry() {
        for kind in ConditionType::ALL {
            assert_eq!(ConditionType::from_id(kind.id()), Some(kind));
            assert_eq!(ConditionType::from_name(kind.name()), Some(kind));
            assert_eq!(kind.name().parse::<ConditionType>().unwrap(), kind);
        }
        assert_eq!(ConditionType::from_id(5), None);
        assert_eq!(
            ConditionType::from_name("PREFIX-SHA-256"),
            Some(ConditionType::PrefixSha256)
        );
        assert!("sha-256".parse::<ConditionType>().is_err());
    }

    #[test]
    fn test_compound_types() {
        let compound: Vec<_> = ConditionType::ALL.into_iter().filter(|t| t.is_compound()).collect();
        assert_eq!(
            compound,
            vec![ConditionType::PrefixSha256, ConditionType::ThresholdSha256]
        );
    }

    #[test]
    fn test_bit_string_encoding() {
        let empty = ConditionTypeSet::new();
        assert_eq!(empty.to_bit_string(), vec![0x00]);

        let preimage: ConditionTypeSet = [ConditionType::PreimageSha256].into_iter().collect();
        assert_eq!(preimage.to_bit_string(), vec![0x07, 0x80]);

        let prefix: ConditionTypeSet = [ConditionType::PrefixSha256].into_iter().collect();
        assert_eq!(prefix.to_bit_string(), vec![0x06, 0x40]);

        let mixed: ConditionTypeSet = [ConditionType::PreimageSha256, ConditionType::Ed25519Sha256]
            .into_iter()
            .collect();
        assert_eq!(mixed.to_bit_string(), vec![0x03, 0x88]);

        assert_eq!(ConditionTypeSet::all().to_bit_string(), vec![0x03, 0xf8]);

        for set in [empty, preimage, prefix, mixed, ConditionTypeSet::all()] {
            assert_eq!(ConditionTypeSet::from_bit_string(&set.to_bit_string()).unwrap(), set);
        }
    }

    #[test]
    fn test_bit_string_rejects_non_canonical() {
        // Empty content
        assert!(ConditionTypeSet::from_bit_string(&[]).is_err());
        // Trailing zero byte
        assert!(ConditionTypeSet::from_bit_string(&[0x00, 0x00]).is_err());
        // Wrong unused-bit count
        assert!(ConditionTypeSet::from_bit_string(&[0x00, 0x80]).is_err());
        // Unused bits with no content
        assert!(ConditionTypeSet::from_bit_string(&[0x03]).is_err());
        // Unknown type id 5
        assert_eq!(
            ConditionTypeSet::from_bit_string(&[0x02, 0x04]),
            Err(DecodeError::UnknownConditionType(5))
        );
    }

    #[test]
    fn test_set_operations() {
        let mut set = ConditionTypeSet::new();
        assert!(set.is_empty());
        set.insert(ConditionType::RsaSha256);
        set.insert(ConditionType::PreimageSha256);
        assert_eq!(set.len(), 2);
        assert!(set.contains(ConditionType::RsaSha256));
        assert!(set.is_subset(&ConditionTypeSet::all()));
        assert!(!ConditionTypeSet::all().is_subset(&set));
        set.remove(ConditionType::RsaSha256);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![ConditionType::PreimageSha256]);
        assert_eq!(format!("{:?}", set), "{PreimageSha256}");
    }

    #[test]
    fn test_fingerprint_hex_roundtrip() {
        let fp = Fingerprint::from_bytes([0x42; 32]);
        let recovered = Fingerprint::from_hex(&fp.to_hex()).unwrap();
        assert_eq!(fp, recovered);
        assert!(Fingerprint::from_hex("abcd").is_err());
        assert_eq!(format!("{:?}", fp), "Fingerprint(4242424242424242)");
    }
}
