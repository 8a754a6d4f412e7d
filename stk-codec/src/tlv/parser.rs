//! Comprehension-TLV Parser
//!
//! Parses the COMPREHENSION-TLV objects used by SIM Toolkit (ETSI TS 101 220
//! §7.1.1) and the single-byte BER-TLV wrappers around proactive commands
//! and envelopes. Parsing is zero-copy: every value borrows the input.

use thiserror::Error;

/// Errors that can occur during TLV parsing
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TlvError {
    #[error("Unexpected end of data while parsing tag")]
    UnexpectedEndTag,

    #[error("Unexpected end of data while parsing length")]
    UnexpectedEndLength,

    #[error("Unexpected end of data while parsing value: need {needed} bytes, {available} available")]
    UnexpectedEndValue { needed: usize, available: usize },

    #[error("Invalid tag byte 0x{0:02X}")]
    InvalidTag(u8),

    #[error("Invalid length encoding 0x{0:02X}")]
    InvalidLength(u8),

    #[error("Non-minimal length encoding for length {0}")]
    NonMinimalLength(usize),

    #[error("Length too large: {0}")]
    LengthTooLarge(usize),

    #[error("Unexpected BER tag 0x{0:02X}")]
    UnexpectedBerTag(u8),
}

/// Largest length a single object may declare
pub const MAX_LENGTH: usize = 0x7FFF;

/// A single COMPREHENSION-TLV object
///
/// - `tag`: the tag number with the comprehension-required bit stripped
/// - `cr`: the comprehension-required flag
/// - `value`: the value bytes, borrowed from the parsed buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComprehensionTlv<'a> {
    /// Tag number (7 bits for the single-byte form, 15 bits for the three-byte form)
    pub tag: u16,
    /// Comprehension required
    pub cr: bool,
    /// The raw value bytes
    pub value: &'a [u8],
}

impl<'a> ComprehensionTlv<'a> {
    /// Length of the value
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Parse a comprehension tag, returning `(tag, cr, bytes consumed)`
///
/// 0x00, 0x80 and 0xFF are not valid tag bytes. 0x7F introduces the
/// three-byte format.
pub fn parse_tag(data: &[u8]) -> Result<(u16, bool, usize), TlvError> {
    let first = *data.first().ok_or(TlvError::UnexpectedEndTag)?;

    match first {
        0x00 | 0x80 | 0xFF => Err(TlvError::InvalidTag(first)),
        0x7F => {
            if data.len() < 3 {
                return Err(TlvError::UnexpectedEndTag);
            }
            let cr = (data[1] & 0x80) != 0;
            let tag = (((data[1] & 0x7F) as u16) << 8) | (data[2] as u16);
            Ok((tag, cr, 3))
        }
        _ => Ok(((first & 0x7F) as u16, (first & 0x80) != 0, 1)),
    }
}

/// Parse a BER length (1-3 bytes), returning `(length, bytes consumed)`
///
/// Non-minimal forms (`81 xx` with xx < 0x80, `82 xxxx` with xxxx < 0x100)
/// are accepted unless `strict` is set.
pub fn parse_length(data: &[u8], strict: bool) -> Result<(usize, usize), TlvError> {
    let first = *data.first().ok_or(TlvError::UnexpectedEndLength)?;

    match first {
        0x00..=0x7F => Ok((first as usize, 1)),
        0x81 => {
            let length = *data.get(1).ok_or(TlvError::UnexpectedEndLength)? as usize;
            if strict && length < 0x80 {
                return Err(TlvError::NonMinimalLength(length));
            }
            Ok((length, 2))
        }
        0x82 => {
            if data.len() < 3 {
                return Err(TlvError::UnexpectedEndLength);
            }
            let length = u16::from_be_bytes([data[1], data[2]]) as usize;
            if length > MAX_LENGTH {
                return Err(TlvError::LengthTooLarge(length));
            }
            if strict && length < 0x100 {
                return Err(TlvError::NonMinimalLength(length));
            }
            Ok((length, 3))
        }
        _ => Err(TlvError::InvalidLength(first)),
    }
}

/// Bounds-checked value extraction
fn take_value(data: &[u8], offset: usize, length: usize) -> Result<&[u8], TlvError> {
    let available = data.len().saturating_sub(offset);
    if length > available {
        return Err(TlvError::UnexpectedEndValue {
            needed: length,
            available,
        });
    }
    Ok(&data[offset..offset + length])
}

/// Parse a single comprehension TLV, returning it with the number of bytes consumed
pub fn read_single(data: &[u8], strict: bool) -> Result<(ComprehensionTlv<'_>, usize), TlvError> {
    let (tag, cr, tag_len) = parse_tag(data)?;
    let (length, len_len) = parse_length(&data[tag_len..], strict)?;
    let offset = tag_len + len_len;
    let value = take_value(data, offset, length)?;

    Ok((ComprehensionTlv { tag, cr, value }, offset + length))
}

/// Parse the single-byte BER-TLV wrapper (0xD0 proactive command, 0xD1-0xDD envelopes)
///
/// Returns the wrapper tag and its value. Bytes after the wrapper are ignored.
pub fn read_ber(data: &[u8], strict: bool) -> Result<(u8, &[u8]), TlvError> {
    let tag = *data.first().ok_or(TlvError::UnexpectedEndTag)?;
    if tag == 0x00 || tag == 0xFF {
        return Err(TlvError::InvalidTag(tag));
    }
    // Multi-byte BER tags never appear as STK wrappers
    if (tag & 0x1F) == 0x1F {
        return Err(TlvError::UnexpectedBerTag(tag));
    }

    let (length, len_len) = parse_length(&data[1..], strict)?;
    let value = take_value(data, 1 + len_len, length)?;
    Ok((tag, value))
}

/// Zero-copy iterator over a sequence of comprehension TLVs
///
/// Yields each object in turn. After the first error no further items are
/// produced.
#[derive(Debug, Clone)]
pub struct TlvReader<'a> {
    data: &'a [u8],
    offset: usize,
    strict: bool,
}

impl<'a> TlvReader<'a> {
    /// Create a reader over `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            strict: false,
        }
    }

    /// Reject non-minimal length encodings
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Number of bytes consumed so far
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not consumed yet
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }
}

impl<'a> Iterator for TlvReader<'a> {
    type Item = Result<ComprehensionTlv<'a>, TlvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.data.len() {
            return None;
        }

        match read_single(&self.data[self.offset..], self.strict) {
            Ok((tlv, consumed)) => {
                self.offset += consumed;
                Some(Ok(tlv))
            }
            Err(e) => {
                self.offset = self.data.len();
                Some(Err(e))
            }
        }
    }
}

/// Parse every object in `data`
pub fn read_list(data: &[u8], strict: bool) -> Result<Vec<ComprehensionTlv<'_>>, TlvError> {
    TlvReader::new(data).strict(strict).collect()
}
