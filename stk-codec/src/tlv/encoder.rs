//! Comprehension-TLV Encoder
//!
//! Encodes COMPREHENSION-TLV objects for terminal responses and envelopes.
//! Lengths always use the shortest BER form.

use super::parser::{TlvError, MAX_LENGTH};

/// TLV Encoder for single objects
pub struct TlvEncoder;

impl TlvEncoder {
    /// Encode just the tag bytes
    ///
    /// Tags below 0x80 use the single-byte format, larger tags the
    /// three-byte format introduced by 0x7F.
    pub fn encode_tag(tag: u16, cr: bool) -> Vec<u8> {
        if tag < 0x80 {
            let cr_bit = if cr { 0x80 } else { 0x00 };
            vec![tag as u8 | cr_bit]
        } else {
            let cr_bit = if cr { 0x80 } else { 0x00 };
            vec![0x7F, ((tag >> 8) as u8 & 0x7F) | cr_bit, tag as u8]
        }
    }

    /// Encode just the length bytes
    pub fn encode_length(length: usize) -> Result<Vec<u8>, TlvError> {
        if length < 0x80 {
            Ok(vec![length as u8])
        } else if length < 0x100 {
            Ok(vec![0x81, length as u8])
        } else if length <= MAX_LENGTH {
            Ok(vec![0x82, (length >> 8) as u8, (length & 0xFF) as u8])
        } else {
            Err(TlvError::LengthTooLarge(length))
        }
    }

    /// Encode a tag-value pair to bytes
    pub fn encode(tag: u16, cr: bool, value: &[u8]) -> Result<Vec<u8>, TlvError> {
        let mut result = Self::encode_tag(tag, cr);
        result.extend(Self::encode_length(value.len())?);
        result.extend_from_slice(value);
        Ok(result)
    }

    /// Wrap `value` in a single-byte BER tag (0xD0-0xDD)
    pub fn encode_ber(tag: u8, value: &[u8]) -> Result<Vec<u8>, TlvError> {
        let mut result = vec![tag];
        result.extend(Self::encode_length(value.len())?);
        result.extend_from_slice(value);
        Ok(result)
    }
}

/// Builder for a sequence of comprehension TLVs
#[derive(Debug, Default, Clone)]
pub struct TlvBuilder {
    data: Vec<u8>,
}

impl TlvBuilder {
    /// Create a new TLV builder
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Add one object
    pub fn push(&mut self, tag: u16, cr: bool, value: &[u8]) -> Result<(), TlvError> {
        self.data.extend(TlvEncoder::encode(tag, cr, value)?);
        Ok(())
    }

    /// Wrap current content in a BER tag
    pub fn wrap(self, ber_tag: u8) -> Result<Vec<u8>, TlvError> {
        TlvEncoder::encode_ber(ber_tag, &self.data)
    }

    /// Build the final byte vector
    pub fn build(self) -> Vec<u8> {
        self.data
    }

    /// Get current length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
