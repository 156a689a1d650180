//! Unsigned big-endian integer codec.
//!
//! Arbitrary-precision non-negative integers travel as minimal big-endian byte
//! strings with no sign byte. DER INTEGER content is two's complement, so a
//! single `0x00` is prepended when the most significant bit would otherwise
//! read as a sign. These helpers add and strip that byte.

use crate::error::DecodeError;

/// Strip leading zero bytes, yielding the minimal unsigned representation.
///
/// Zero is represented by the empty slice.
pub fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Encode a `u64` as minimal unsigned big-endian bytes (zero is empty).
pub fn to_unsigned_bytes(value: u64) -> Vec<u8> {
    strip_leading_zeros(&value.to_be_bytes()).to_vec()
}

/// Decode minimal or zero-padded unsigned big-endian bytes into a `u64`.
pub fn from_unsigned_bytes(bytes: &[u8]) -> Result<u64, DecodeError> {
    let bytes = strip_leading_zeros(bytes);
    if bytes.len() > 8 {
        return Err(DecodeError::IntegerOverflow);
    }
    Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

/// Convert unsigned big-endian bytes into DER INTEGER content.
///
/// Leading zeros are removed, then a single `0x00` sign byte is added back
/// when the high bit of the first byte is set. Zero encodes as `[0x00]`.
pub fn to_der_integer(unsigned: &[u8]) -> Vec<u8> {
    let minimal = strip_leading_zeros(unsigned);
    match minimal.first() {
        None => vec![0x00],
        Some(&first) if first & 0x80 != 0 => {
            let mut out = Vec::with_capacity(minimal.len() + 1);
            out.push(0x00);
            out.extend_from_slice(minimal);
            out
        }
        Some(_) => minimal.to_vec(),
    }
}

/// Validate DER INTEGER content as a canonical non-negative integer and return
/// its unsigned magnitude (without the sign byte).
pub fn from_der_integer(content: &[u8]) -> Result<&[u8], DecodeError> {
    match content {
        [] => Err(DecodeError::NonCanonicalInteger),
        [first, ..] if first & 0x80 != 0 => Err(DecodeError::NonCanonicalInteger),
        [0x00] => Ok(&content[1..]),
        [0x00, second, ..] if second & 0x80 == 0 => Err(DecodeError::NonCanonicalInteger),
        [0x00, ..] => Ok(&content[1..]),
        _ => Ok(content),
    }
}

/// Decode DER INTEGER content into a `u64`.
pub fn u64_from_der_integer(content: &[u8]) -> Result<u64, DecodeError> {
    from_unsigned_bytes(from_der_integer(content)?)
}

/// Encode a `u64` as DER INTEGER content.
pub fn u64_to_der_integer(value: u64) -> Vec<u8> {
    to_der_integer(&value.to_be_bytes())
}
