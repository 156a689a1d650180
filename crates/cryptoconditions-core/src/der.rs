//! DER primitive codec for the subset of ASN.1 used by crypto-conditions.
//!
//! Only single-byte tags are supported (tag numbers 0-30). Lengths use the
//! definite short or long form with minimal encoding. Every declared length is
//! checked against a ceiling and against the remaining input before any slice
//! is taken, so a crafted length field cannot trigger a large allocation.

use crate::error::DecodeError;

/// Universal and context-specific tags used by the format.
pub mod tags {
    pub const INTEGER: u8 = 0x02;
    pub const BIT_STRING: u8 = 0x03;
    pub const OCTET_STRING: u8 = 0x04;
    pub const SEQUENCE: u8 = 0x30;

    const CONTEXT: u8 = 0x80;
    const CONSTRUCTED: u8 = 0x20;

    /// Context-specific primitive tag `[n]`.
    pub const fn context(n: u8) -> u8 {
        CONTEXT | n
    }

    /// Context-specific constructed tag `[n]`.
    pub const fn context_constructed(n: u8) -> u8 {
        CONTEXT | CONSTRUCTED | n
    }
}

/// Default ceiling for any single declared length.
pub const DEFAULT_MAX_LENGTH: usize = 1024 * 1024;

/// A single-byte DER identifier octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag(pub u8);

impl Tag {
    /// The class bits (top two bits).
    pub fn class(self) -> u8 {
        self.0 >> 6
    }

    /// Whether the constructed bit is set.
    pub fn is_constructed(self) -> bool {
        self.0 & 0x20 != 0
    }

    /// The tag number (low five bits).
    pub fn number(self) -> u8 {
        self.0 & 0x1f
    }

    /// Whether this is a context-specific tag.
    pub fn is_context_specific(self) -> bool {
        self.class() == 0b10
    }
}

/// A cursor over DER-encoded input.
#[derive(Debug, Clone)]
pub struct DerReader<'a> {
    buf: &'a [u8],
    pos: usize,
    max_length: usize,
}

impl<'a> DerReader<'a> {
    /// Create a reader with the default length ceiling.
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_max_length(buf, DEFAULT_MAX_LENGTH)
    }

    /// Create a reader with an explicit length ceiling.
    pub fn with_max_length(buf: &'a [u8], max_length: usize) -> Self {
        Self {
            buf,
            pos: 0,
            max_length,
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True when every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The configured length ceiling.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let b = *self.buf.get(self.pos).ok_or(DecodeError::UnexpectedEof)?;
        self.pos += 1;
        Ok(b)
    }

    /// Look at the next tag without consuming it.
    pub fn peek_tag(&self) -> Option<Tag> {
        self.buf.get(self.pos).copied().map(Tag)
    }

    /// Read an identifier octet.
    pub fn read_tag(&mut self) -> Result<Tag, DecodeError> {
        let b = self.read_byte()?;
        if b & 0x1f == 0x1f {
            return Err(DecodeError::UnsupportedTag(b));
        }
        Ok(Tag(b))
    }

    /// Read a definite length, validated against the ceiling and the input.
    pub fn read_length(&mut self) -> Result<usize, DecodeError> {
        let first = self.read_byte()?;
        let declared = if first & 0x80 == 0 {
            u64::from(first)
        } else {
            let count = usize::from(first & 0x7f);
            if count == 0 {
                return Err(DecodeError::IndefiniteLength);
            }
            if count > 8 {
                return Err(DecodeError::LengthTooLarge {
                    declared: u64::MAX,
                    max: self.max_length,
                });
            }
            if count > self.remaining() {
                return Err(DecodeError::UnexpectedEof);
            }
            let bytes = &self.buf[self.pos..self.pos + count];
            self.pos += count;
            if bytes[0] == 0 {
                return Err(DecodeError::NonMinimalLength);
            }
            let value = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
            if value < 0x80 {
                return Err(DecodeError::NonMinimalLength);
            }
            value
        };

        if declared > self.max_length as u64 {
            return Err(DecodeError::LengthTooLarge {
                declared,
                max: self.max_length,
            });
        }
        if declared > self.remaining() as u64 {
            return Err(DecodeError::LengthExceedsInput {
                declared,
                remaining: self.remaining(),
            });
        }
        // Bounded by remaining(), which is a usize.
        Ok(declared as usize)
    }

    /// Read a complete tag-length-value, returning the tag and value slice.
    pub fn read_tlv(&mut self) -> Result<(Tag, &'a [u8]), DecodeError> {
        let tag = self.read_tag()?;
        let len = self.read_length()?;
        let value = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok((tag, value))
    }

    /// Read a TLV and require a specific tag.
    pub fn expect(&mut self, expected: u8) -> Result<&'a [u8], DecodeError> {
        let (tag, value) = self.read_tlv()?;
        if tag.0 != expected {
            return Err(DecodeError::UnexpectedTag {
                expected,
                actual: tag.0,
            });
        }
        Ok(value)
    }

    /// A reader over a nested value, sharing this reader's ceiling.
    pub fn nested(&self, value: &'a [u8]) -> DerReader<'a> {
        DerReader::with_max_length(value, self.max_length)
    }

    /// Fail if any input remains.
    pub fn finish(&self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }
}

/// Append a minimal DER length.
pub fn write_length(buf: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        buf.push(len as u8);
    } else {
        let bytes = (len as u64).to_be_bytes();
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(7);
        buf.push(0x80 | (8 - start) as u8);
        buf.extend_from_slice(&bytes[start..]);
    }
}

/// Append a tag-length-value.
pub fn write_tlv(buf: &mut Vec<u8>, tag: u8, value: &[u8]) {
    buf.push(tag);
    write_length(buf, value.len());
    buf.extend_from_slice(value);
}

/// Encode a tag-length-value into a fresh buffer.
pub fn encode_tlv(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(value.len() + 6);
    write_tlv(&mut buf, tag, value);
    buf
}
