//! Character set conversion for toolkit strings
//!
//! Text strings carry a data coding scheme byte (TS 23.038 §4 for SMS,
//! §5 for cell broadcast / USSD); alpha identifiers use the SIM coding
//! of TS 102.221 Annex A.

pub mod alpha;
pub mod gsm;

use thiserror::Error;

pub use alpha::{decode_alpha, encode_alpha};
pub use gsm::{gsm_to_string, is_gsm_representable, pack_7bit, string_to_gsm, unpack_7bit};

/// Character set conversion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharsetError {
    #[error("Unsupported data coding scheme 0x{0:02X}")]
    UnsupportedDcs(u8),

    #[error("Invalid GSM character 0x{0:02X}")]
    InvalidGsm(u8),

    #[error("Character {0:?} has no GSM encoding")]
    Unencodable(char),

    #[error("Odd UCS2 length {0}")]
    OddUcs2Length(usize),

    #[error("Invalid UCS2 data")]
    InvalidUcs2,

    #[error("Invalid alpha identifier: {0}")]
    InvalidAlpha(&'static str),
}

/// Character set selected by a data coding scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// GSM default alphabet, 7-bit packed
    Gsm7,
    /// GSM default alphabet, one character per byte
    Gsm8,
    /// UCS2 big-endian
    Ucs2,
}

impl Charset {
    /// The DCS byte this charset is written with
    pub fn dcs(&self) -> u8 {
        match self {
            Charset::Gsm7 => 0x00,
            Charset::Gsm8 => 0x04,
            Charset::Ucs2 => 0x08,
        }
    }
}

/// Classify an SMS data coding scheme (TS 23.038 §4)
pub fn sms_dcs_charset(dcs: u8) -> Result<Charset, CharsetError> {
    match dcs >> 4 {
        // General data coding, including the automatic deletion group
        0x0..=0x7 => {
            if dcs & 0x20 != 0 {
                return Err(CharsetError::UnsupportedDcs(dcs));
            }
            match (dcs >> 2) & 0x03 {
                0 => Ok(Charset::Gsm7),
                1 => Ok(Charset::Gsm8),
                2 => Ok(Charset::Ucs2),
                _ => Err(CharsetError::UnsupportedDcs(dcs)),
            }
        }
        // Message waiting indication groups
        0xC | 0xD => Ok(Charset::Gsm7),
        0xE => Ok(Charset::Ucs2),
        0xF => {
            if dcs & 0x04 != 0 {
                Ok(Charset::Gsm8)
            } else {
                Ok(Charset::Gsm7)
            }
        }
        _ => Err(CharsetError::UnsupportedDcs(dcs)),
    }
}

/// Convert UCS2 big-endian bytes to a string
pub fn ucs2_to_string(data: &[u8]) -> Result<String, CharsetError> {
    if data.len() % 2 != 0 {
        return Err(CharsetError::OddUcs2Length(data.len()));
    }
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| CharsetError::InvalidUcs2)
}

/// Convert a string to UCS2 big-endian bytes
pub fn string_to_ucs2(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|unit| unit.to_be_bytes()).collect()
}

/// Decode `data` in the given charset
pub fn decode_text(charset: Charset, data: &[u8]) -> Result<String, CharsetError> {
    match charset {
        Charset::Gsm7 => gsm_to_string(&gsm::unpack_all(data)),
        Charset::Gsm8 => gsm_to_string(data),
        Charset::Ucs2 => ucs2_to_string(data),
    }
}

/// Encode `text` in the given charset
pub fn encode_text(charset: Charset, text: &str) -> Result<Vec<u8>, CharsetError> {
    match charset {
        Charset::Gsm7 => Ok(pack_7bit(&string_to_gsm(text)?)),
        Charset::Gsm8 => string_to_gsm(text),
        Charset::Ucs2 => Ok(string_to_ucs2(text)),
    }
}

/// Decode a Text String value body: DCS byte followed by the data
pub fn decode_text_string(dcs: u8, data: &[u8]) -> Result<String, CharsetError> {
    decode_text(sms_dcs_charset(dcs)?, data)
}

/// Decode a USSD string with a cell broadcast DCS (TS 23.038 §5)
pub fn decode_ussd(dcs: u8, data: &[u8]) -> Result<String, CharsetError> {
    match dcs >> 4 {
        0x0 | 0x2 | 0x3 => decode_text(Charset::Gsm7, data),
        0x1 => match dcs & 0x0F {
            // Two-character language code and CR precede the text
            0x0 => {
                let text = decode_text(Charset::Gsm7, data)?;
                Ok(text.chars().skip(3).collect())
            }
            // Language code packed in the first two octets
            0x1 => {
                let body = data.get(2..).unwrap_or_default();
                ucs2_to_string(body)
            }
            _ => Err(CharsetError::UnsupportedDcs(dcs)),
        },
        0x4..=0x7 | 0xF => decode_text(sms_dcs_charset(dcs)?, data),
        _ => Err(CharsetError::UnsupportedDcs(dcs)),
    }
}
