//! Dialling-number objects: address, SS string, DTMF string
//!
//! All three use the EF_ADN BCD coding (TS 31.102 §4.4.2.3): two digits
//! per byte, low nibble first, 0xF filler in the last high nibble.

use super::{DataObject, ObjectError};

const BCD_DIGITS: &[u8; 15] = b"0123456789*#pwe";

fn decode_bcd(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for &byte in data {
        for nibble in [byte & 0x0F, byte >> 4] {
            match BCD_DIGITS.get(nibble as usize) {
                Some(&digit) => out.push(digit as char),
                None => return out,
            }
        }
    }
    out
}

fn encode_bcd(object: &'static str, digits: &str, out: &mut Vec<u8>) -> Result<(), ObjectError> {
    let mut nibbles = Vec::with_capacity(digits.len());
    for character in digits.chars() {
        let lower = character.to_ascii_lowercase();
        let nibble = BCD_DIGITS
            .iter()
            .position(|&d| d as char == lower)
            .ok_or(ObjectError::InvalidCharacter { object, character })?;
        nibbles.push(nibble as u8);
    }

    for pair in nibbles.chunks(2) {
        let high = pair.get(1).copied().unwrap_or(0x0F);
        out.push(pair[0] | (high << 4));
    }
    Ok(())
}

/// Address (TS 102.223 §8.1): TON/NPI byte followed by the dialling number
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub ton_npi: u8,
    pub number: String,
}

impl Address {
    pub fn new(ton_npi: u8, number: impl Into<String>) -> Self {
        Self {
            ton_npi,
            number: number.into(),
        }
    }

    /// Type of number (bits 7..5)
    pub fn ton(&self) -> u8 {
        (self.ton_npi >> 4) & 0x07
    }

    /// Numbering plan identification (bits 4..1)
    pub fn npi(&self) -> u8 {
        self.ton_npi & 0x0F
    }

    pub fn is_international(&self) -> bool {
        self.ton() == 0x01
    }
}

impl DataObject for Address {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        let (&ton_npi, digits) = value.split_first().ok_or(ObjectError::InvalidLength {
            object: "address",
            length: 0,
        })?;
        Ok(Self {
            ton_npi,
            number: decode_bcd(digits),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.push(self.ton_npi);
        encode_bcd("address", &self.number, out)
    }
}

/// SS string (§8.14), coded like an address
pub type SsString = Address;

/// DTMF string (§8.44); 'p' is a pause
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DtmfString(pub String);

impl DataObject for DtmfString {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        Ok(Self(decode_bcd(value)))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        encode_bcd("DTMF string", &self.0, out)
    }
}
