//! SIM alpha identifier coding (TS 102.221 Annex A)
//!
//! An alpha identifier is either GSM 8-bit default alphabet padded with
//! 0xFF, or one of three UCS2 forms selected by the first byte.

use super::gsm::{self, ESCAPE};
use super::{string_to_ucs2, CharsetError};

const UCS2_PLAIN: u8 = 0x80;
const UCS2_BASE_7BIT: u8 = 0x81;
const UCS2_BASE_16BIT: u8 = 0x82;

/// Decode an alpha identifier value
///
/// An empty value decodes to an empty string.
pub fn decode_alpha(data: &[u8]) -> Result<String, CharsetError> {
    match data.first() {
        None => Ok(String::new()),
        Some(&UCS2_PLAIN) => decode_plain_ucs2(&data[1..]),
        Some(&UCS2_BASE_7BIT) => {
            if data.len() < 3 {
                return Err(CharsetError::InvalidAlpha("short 0x81 header"));
            }
            let base = (data[2] as u16) << 7;
            decode_based(data[1] as usize, base, &data[3..])
        }
        Some(&UCS2_BASE_16BIT) => {
            if data.len() < 4 {
                return Err(CharsetError::InvalidAlpha("short 0x82 header"));
            }
            let base = u16::from_be_bytes([data[2], data[3]]);
            decode_based(data[1] as usize, base, &data[4..])
        }
        Some(_) => {
            let end = data.iter().position(|&b| b == 0xFF).unwrap_or(data.len());
            gsm::gsm_to_string(&data[..end])
        }
    }
}

/// Characters end at 0xFFFF; a lone trailing byte is only allowed as padding
fn decode_plain_ucs2(data: &[u8]) -> Result<String, CharsetError> {
    let pairs = data.chunks_exact(2);
    let rest = pairs.remainder();
    let mut units = Vec::with_capacity(data.len() / 2);
    let mut terminated = false;
    for pair in pairs {
        let unit = u16::from_be_bytes([pair[0], pair[1]]);
        if unit == 0xFFFF {
            terminated = true;
            break;
        }
        units.push(unit);
    }
    if !terminated && matches!(rest, [byte] if *byte != 0xFF) {
        return Err(CharsetError::OddUcs2Length(data.len()));
    }
    String::from_utf16(&units).map_err(|_| CharsetError::InvalidUcs2)
}

/// Decode the 0x81/0x82 forms: bytes with bit 8 set are offsets from `base`,
/// the rest are GSM default alphabet characters.
fn decode_based(count: usize, base: u16, data: &[u8]) -> Result<String, CharsetError> {
    let chars = data
        .get(..count)
        .ok_or(CharsetError::InvalidAlpha("character count exceeds data"))?;

    let mut out = String::with_capacity(count);
    let mut iter = chars.iter().copied();
    while let Some(byte) = iter.next() {
        if byte & 0x80 != 0 {
            let unit = base.wrapping_add((byte & 0x7F) as u16);
            let c = char::from_u32(unit as u32).ok_or(CharsetError::InvalidUcs2)?;
            out.push(c);
        } else if byte == ESCAPE {
            if let Some(next) = iter.next() {
                out.push_str(&gsm::gsm_to_string(&[ESCAPE, next])?);
            }
        } else {
            out.push(gsm::default_char(byte)?);
        }
    }
    Ok(out)
}

/// Encode an alpha identifier
///
/// GSM 8-bit when every character is representable, otherwise plain UCS2.
pub fn encode_alpha(text: &str) -> Vec<u8> {
    match gsm::string_to_gsm(text) {
        Ok(septets) => septets,
        Err(_) => {
            let mut out = vec![UCS2_PLAIN];
            out.extend(string_to_ucs2(text));
            out
        }
    }
}
