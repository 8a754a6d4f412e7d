//! Text-bearing objects: text string, alpha identifier, USSD string,
//! text attribute

use super::{DataObject, ObjectError};
use crate::charset::{self, Charset, CharsetError};

/// Decode a Text String value (TS 102.223 §8.15)
///
/// A zero-length value is a null text string and decodes to "".
pub fn decode_text_string(value: &[u8]) -> Result<String, ObjectError> {
    match value.split_first() {
        None => Ok(String::new()),
        Some((&dcs, data)) => Ok(charset::decode_text_string(dcs, data)?),
    }
}

/// Append a Text String value coded with `coding`
pub fn encode_text_string(coding: Charset, text: &str, out: &mut Vec<u8>) -> Result<(), ObjectError> {
    out.push(coding.dcs());
    out.extend(charset::encode_text(coding, text)?);
    Ok(())
}

/// Decode an Alpha Identifier value (§8.2)
pub fn decode_alpha_id(value: &[u8]) -> Result<String, ObjectError> {
    Ok(charset::decode_alpha(value)?)
}

pub fn encode_alpha_id(text: &str, out: &mut Vec<u8>) {
    out.extend(charset::encode_alpha(text));
}

/// USSD string (§8.17): a cell broadcast DCS and the coded string
///
/// Kept coded so that a terminal can forward it to the network as is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UssdString {
    pub dcs: u8,
    pub data: Vec<u8>,
}

impl UssdString {
    /// GSM default alphabet, language unspecified
    pub fn gsm(text: &str) -> Result<Self, CharsetError> {
        Ok(Self {
            dcs: 0x0F,
            data: charset::encode_text(Charset::Gsm7, text)?,
        })
    }

    /// Decode the string
    pub fn text(&self) -> Result<String, CharsetError> {
        charset::decode_ussd(self.dcs, &self.data)
    }
}

impl DataObject for UssdString {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        let (&dcs, data) = value.split_first().ok_or(ObjectError::InvalidLength {
            object: "USSD string",
            length: 0,
        })?;
        Ok(Self {
            dcs,
            data: data.to_vec(),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.push(self.dcs);
        out.extend_from_slice(&self.data);
        Ok(())
    }
}

/// One text formatting entry (§8.72)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextFormat {
    pub start: u8,
    pub length: u8,
    pub format: u8,
    pub color: u8,
}

impl TextFormat {
    /// 0 left, 1 centre, 2 right, 3 language dependent
    pub fn alignment(&self) -> u8 {
        self.format & 0x03
    }

    /// 0 normal, 1 large, 2 small
    pub fn font_size(&self) -> u8 {
        (self.format >> 2) & 0x03
    }

    pub fn bold(&self) -> bool {
        self.format & 0x10 != 0
    }

    pub fn italic(&self) -> bool {
        self.format & 0x20 != 0
    }

    pub fn underline(&self) -> bool {
        self.format & 0x40 != 0
    }

    pub fn strikethrough(&self) -> bool {
        self.format & 0x80 != 0
    }

    pub fn foreground(&self) -> u8 {
        self.color & 0x0F
    }

    pub fn background(&self) -> u8 {
        self.color >> 4
    }
}

/// Text attribute / item text attribute list: groups of four bytes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextAttribute(pub Vec<TextFormat>);

impl DataObject for TextAttribute {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        if value.len() % 4 != 0 {
            return Err(ObjectError::InvalidLength {
                object: "text attribute",
                length: value.len(),
            });
        }
        Ok(Self(
            value
                .chunks_exact(4)
                .map(|c| TextFormat {
                    start: c[0],
                    length: c[1],
                    format: c[2],
                    color: c[3],
                })
                .collect(),
        ))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        for f in &self.0 {
            out.extend_from_slice(&[f.start, f.length, f.format, f.color]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_string_8bit() {
        let value = hex::decode("04456E74657220222B22").unwrap();
        assert_eq!(decode_text_string(&value).unwrap(), "Enter \"+\"");
    }

    #[test]
    fn test_text_string_null() {
        assert_eq!(decode_text_string(&[]).unwrap(), "");
        assert_eq!(decode_text_string(&[0x04]).unwrap(), "");
    }

    #[test]
    fn test_text_string_bad_dcs() {
        assert!(matches!(
            decode_text_string(&[0x0C, 0x41]),
            Err(ObjectError::Charset(CharsetError::UnsupportedDcs(0x0C)))
        ));
    }

    #[test]
    fn test_encode_text_string() {
        let mut out = Vec::new();
        encode_text_string(Charset::Gsm8, "+", &mut out).unwrap();
        assert_eq!(out, vec![0x04, 0x2B]);

        let mut out = Vec::new();
        encode_text_string(Charset::Ucs2, "Ж", &mut out).unwrap();
        assert_eq!(out, vec![0x08, 0x04, 0x16]);
    }

    #[test]
    fn test_alpha_id() {
        let mut out = Vec::new();
        encode_alpha_id("Call", &mut out);
        assert_eq!(decode_alpha_id(&out).unwrap(), "Call");
    }

    #[test]
    fn test_ussd_string() {
        let ussd = UssdString::gsm("*#31#").unwrap();
        let value = ussd.to_value().unwrap();
        assert_eq!(value[0], 0x0F);
        let decoded = UssdString::decode(&value).unwrap();
        assert_eq!(decoded.text().unwrap(), "*#31#");
        assert!(UssdString::decode(&[]).is_err());
    }

    #[test]
    fn test_text_attribute() {
        let value = hex::decode("000E00B4").unwrap();
        let attr = TextAttribute::decode(&value).unwrap();
        assert_eq!(attr.0.len(), 1);
        let format = attr.0[0];
        assert_eq!(format.length, 0x0E);
        assert_eq!(format.alignment(), 0);
        assert_eq!(format.foreground(), 0x04);
        assert_eq!(format.background(), 0x0B);
        assert_eq!(attr.to_value().unwrap(), value);
    }

    #[test]
    fn test_text_attribute_bad_length() {
        assert_eq!(
            TextAttribute::decode(&[0x00, 0x0E, 0x00]),
            Err(ObjectError::InvalidLength { object: "text attribute", length: 3 })
        );
    }
}
