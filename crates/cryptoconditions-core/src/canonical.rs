//! Canonical fingerprint contents and ordering.
//!
//! Fingerprints commit to a variant-specific DER structure rather than to raw
//! key material, and compound conditions commit to their children by encoded
//! condition. Branch lists are sorted by the canonical order so that the same
//! set of branches always produces the same bytes.

use std::cmp::Ordering;

use crate::condition::Condition;
use crate::der::{tags, write_tlv};
use crate::uint::u64_to_der_integer;

/// Fixed cost added by every prefix condition and by every threshold branch.
pub const COMPOUND_OVERHEAD: u64 = 1024;

/// Fixed cost of an Ed25519 condition.
pub const ED25519_COST: u64 = 131_072;

/// Compare two encoded conditions.
///
/// Unsigned byte-wise lexicographic order; when one encoding is a prefix of
/// the other, the shorter sorts first.
pub fn compare_encoded(a: &[u8], b: &[u8]) -> Ordering {
    // Slice ordering on u8 is exactly this order.
    a.cmp(b)
}

/// Encode conditions and return their encodings in canonical order.
pub fn sorted_encodings<'a, I>(conditions: I) -> Vec<Vec<u8>>
where
    I: IntoIterator<Item = &'a Condition>,
{
    let mut encoded: Vec<Vec<u8>> = conditions.into_iter().map(Condition::to_bytes).collect();
    encoded.sort_by(|a, b| compare_encoded(a, b));
    encoded
}

/// `SEQUENCE { [0] prefix, [1] maxMessageLength, [2] { subcondition } }`
pub fn prefix_fingerprint_contents(
    prefix: &[u8],
    max_message_length: u64,
    subcondition: &Condition,
) -> Vec<u8> {
    let mut body = Vec::with_capacity(prefix.len() + 64);
    write_tlv(&mut body, tags::context(0), prefix);
    write_tlv(&mut body, tags::context(1), &u64_to_der_integer(max_message_length));
    write_tlv(&mut body, tags::context_constructed(2), &subcondition.to_bytes());

    let mut out = Vec::with_capacity(body.len() + 6);
    write_tlv(&mut out, tags::SEQUENCE, &body);
    out
}

/// `SEQUENCE { [0] threshold, [1] { subconditions in canonical order } }`
pub fn threshold_fingerprint_contents(threshold: u64, subconditions: &[Condition]) -> Vec<u8> {
    let set: Vec<u8> = sorted_encodings(subconditions).concat();

    let mut body = Vec::with_capacity(set.len() + 16);
    write_tlv(&mut body, tags::context(0), &u64_to_der_integer(threshold));
    write_tlv(&mut body, tags::context_constructed(1), &set);

    let mut out = Vec::with_capacity(body.len() + 6);
    write_tlv(&mut out, tags::SEQUENCE, &body);
    out
}

/// `SEQUENCE { [0] modulus }`, the modulus as unsigned big-endian bytes.
pub fn rsa_fingerprint_contents(modulus: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(modulus.len() + 4);
    write_tlv(&mut body, tags::context(0), modulus);

    let mut out = Vec::with_capacity(body.len() + 4);
    write_tlv(&mut out, tags::SEQUENCE, &body);
    out
}

/// `SEQUENCE { [0] publicKey }`
pub fn ed25519_fingerprint_contents(public_key: &[u8; 32]) -> Vec<u8> {
    let mut body = Vec::with_capacity(34);
    write_tlv(&mut body, tags::context(0), public_key);

    let mut out = Vec::with_capacity(36);
    write_tlv(&mut out, tags::SEQUENCE, &body);
    out
}

/// RSA cost: the square of the modulus length in bytes.
pub fn rsa_cost(modulus_len: usize) -> u64 {
    let len = modulus_len as u64;
    len * len
}

/// Threshold cost: the `threshold` largest branch costs plus a fixed
/// overhead per branch. `None` on overflow.
pub fn threshold_cost(threshold: usize, branch_costs: &[u64]) -> Option<u64> {
    let mut costs = branch_costs.to_vec();
    costs.sort_unstable_by(|a, b| b.cmp(a));
    let largest = costs
        .iter()
        .take(threshold)
        .try_fold(0u64, |acc, &c| acc.checked_add(c))?;
    let overhead = COMPOUND_OVERHEAD.checked_mul(branch_costs.len() as u64)?;
    largest.checked_add(overhead)
}

/// Prefix cost: prefix length plus maximum message length plus the
/// subcondition cost plus a fixed overhead. `None` on overflow.
pub fn prefix_cost(prefix_len: usize, max_message_length: u64, subcondition_cost: u64) -> Option<u64> {
    (prefix_len as u64)
        .checked_add(max_message_length)?
        .checked_add(subcondition_cost)?
        .checked_add(COMPOUND_OVERHEAD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;

    #[test]
    fn test_compare_encoded_unsigned() {
        // 0xff must sort after 0x01 (unsigned, not signed, bytes).
        assert_eq!(compare_encoded(&[0x01], &[0xff]), Ordering::Less);
        assert_eq!(compare_encoded(&[0xff], &[0x7f]), Ordering::Greater);
        // Strict prefix sorts first.
        assert_eq!(compare_encoded(&[0xa0, 0x01], &[0xa0, 0x01, 0x00]), Ordering::Less);
        assert_eq!(compare_encoded(&[0xa0], &[0xa0]), Ordering::Equal);
    }

    #[test]
    fn test_prefix_fingerprint_contents_known_value() {
        let sub = Condition::preimage_sha256(b"Roads? Where we're going, we don't need roads.");
        let contents = prefix_fingerprint_contents(b"Order-12345", 16384, &sub);
        assert_eq!(
            hex::encode(&contents),
            concat!(
                "303a800b4f726465722d313233343581024000a227a0258020fb6f0454dafbacec10",
                "fd7b2fac95712ef8c1637f1935994768f1d8a6c21b987e81012e",
            )
        );
    }

    #[test]
    fn test_ed25519_fingerprint_contents_layout() {
        let contents = ed25519_fingerprint_contents(&[0x11; 32]);
        assert_eq!(&contents[..4], &[0x30, 0x22, 0x80, 0x20]);
        assert_eq!(contents.len(), 36);
    }

    #[test]
    fn test_costs() {
        assert_eq!(rsa_cost(256), 65_536);
        assert_eq!(rsa_cost(512), 262_144);
        assert_eq!(prefix_cost(11, 1000, 46), Some(2081));
        assert_eq!(prefix_cost(0, u64::MAX, 1), None);

        // Two largest of {46, 132201, 65536} plus 3 * 1024.
        assert_eq!(threshold_cost(2, &[46, 132_201, 65_536]), Some(200_809));
        assert_eq!(threshold_cost(1, &[10]), Some(1034));
        assert_eq!(threshold_cost(2, &[u64::MAX, 1]), None);
    }
}
