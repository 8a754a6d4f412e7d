//! R-APDU object
//!
//! The answer of an additional card reader: response data followed by
//! SW1/SW2.

use super::ApduError;
use crate::objects::{DataObject, ObjectError};

/// A card reader response
///
/// # Example
/// ```ignore
/// let response = RApdu::parse(&[0x01, 0x02, 0x90, 0x00]).unwrap();
/// assert_eq!(response.sw(), 0x9000);
/// assert_eq!(response.to_bytes(), vec![0x01, 0x02, 0x90, 0x00]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RApdu {
    /// Response data without the status word
    pub data: Vec<u8>,
    pub sw1: u8,
    pub sw2: u8,
}

impl RApdu {
    pub fn new(data: Vec<u8>, sw: u16) -> Self {
        let [sw1, sw2] = sw.to_be_bytes();
        Self { data, sw1, sw2 }
    }

    /// Response data with 9000
    pub fn success(data: Vec<u8>) -> Self {
        Self::new(data, 0x9000)
    }

    /// Split raw bytes into data and status word
    pub fn parse(raw: &[u8]) -> Result<Self, ApduError> {
        if raw.len() < 2 {
            return Err(ApduError::TooShort {
                expected: 2,
                actual: raw.len(),
            });
        }
        let (data, sw) = raw.split_at(raw.len() - 2);
        Ok(Self {
            data: data.to_vec(),
            sw1: sw[0],
            sw2: sw[1],
        })
    }

    pub fn sw(&self) -> u16 {
        u16::from_be_bytes([self.sw1, self.sw2])
    }

    /// Data followed by SW1 SW2
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 2);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&[self.sw1, self.sw2]);
        out
    }
}

impl DataObject for RApdu {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        Ok(Self::parse(value)?)
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.extend(self.to_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let resp = RApdu::success(vec![0xDE, 0xAD]);
        assert_eq!(resp.sw(), 0x9000);
        assert_eq!(resp.to_bytes(), vec![0xDE, 0xAD, 0x90, 0x00]);
    }

    #[test]
    fn test_parse() {
        let resp = RApdu::parse(&hex::decode("0102039F0F").unwrap()).unwrap();
        assert_eq!(resp.data, vec![0x01, 0x02, 0x03]);
        assert_eq!(resp.sw(), 0x9F0F);

        let resp = RApdu::parse(&[0x6A, 0x82]).unwrap();
        assert!(resp.data.is_empty());
        assert_eq!(resp, RApdu::new(Vec::new(), 0x6A82));

        assert_eq!(
            RApdu::parse(&[0x90]),
            Err(ApduError::TooShort { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_data_object() {
        let resp = RApdu::decode(&[0x6F, 0x00]).unwrap();
        assert!(resp.data.is_empty());
        assert_eq!(resp.to_value().unwrap(), vec![0x6F, 0x00]);
        assert!(RApdu::decode(&[0x6F]).is_err());
    }
}
