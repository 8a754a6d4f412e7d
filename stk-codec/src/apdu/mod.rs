//! C-APDU and R-APDU data objects
//!
//! PERFORM CARD APDU carries an ISO 7816-4 command APDU for an additional
//! card reader (TS 102.223 §8.35); the terminal response returns the
//! reader's answer as an R-APDU (§8.36). Only the short APDU format
//! appears inside these objects.
//!
//! # Example
//! ```ignore
//! use stk_codec::apdu::{parse_c_apdu, RApdu};
//!
//! let raw = &[0xA0, 0xA4, 0x00, 0x00, 0x02, 0x3F, 0x00];
//! let apdu = parse_c_apdu(raw).unwrap();
//! println!("INS: 0x{:02X}", apdu.ins);
//!
//! let response = RApdu::parse(&[0x01, 0x02, 0x03, 0x90, 0x00]).unwrap();
//! assert_eq!(response.data, vec![0x01, 0x02, 0x03]);
//! assert_eq!(response.to_bytes(), vec![0x01, 0x02, 0x03, 0x90, 0x00]);
//! ```

mod response;

pub use response::RApdu;

use thiserror::Error;

use crate::objects::{DataObject, ObjectError};

/// Errors that can occur during APDU parsing
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ApduError {
    #[error("APDU too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("Invalid APDU length")]
    InvalidLength,

    #[error("APDU data too long: {0} bytes")]
    DataTooLong(usize),
}

/// A command APDU for an additional card reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CApdu {
    /// Class byte (CLA)
    pub cla: u8,
    /// Instruction byte (INS)
    pub ins: u8,
    /// Parameter 1 (P1)
    pub p1: u8,
    /// Parameter 2 (P2)
    pub p2: u8,
    /// Lc is implied by the length
    pub data: Vec<u8>,
    /// Le, with a zero byte read as 256
    pub le: Option<u16>,
}

impl CApdu {
    /// Create a new APDU with just the header (CLA, INS, P1, P2)
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Vec::new(),
            le: None,
        }
    }

    /// Create a new APDU with data
    pub fn with_data(cla: u8, ins: u8, p1: u8, p2: u8, data: Vec<u8>) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data,
            le: None,
        }
    }

    /// Set the expected response length
    pub fn with_le(mut self, le: u16) -> Self {
        self.le = Some(le);
        self
    }

    /// Serialize in short format
    ///
    /// Le of 256 is written as 0x00.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ApduError> {
        if self.data.len() > 0xFF {
            return Err(ApduError::DataTooLong(self.data.len()));
        }

        let mut out = Vec::with_capacity(6 + self.data.len());
        out.extend_from_slice(&[self.cla, self.ins, self.p1, self.p2]);
        if !self.data.is_empty() {
            out.push(self.data.len() as u8);
            out.extend_from_slice(&self.data);
        }
        match self.le {
            None => {}
            Some(256) => out.push(0x00),
            Some(le) if le <= 0xFF => out.push(le as u8),
            Some(_) => return Err(ApduError::InvalidLength),
        }
        Ok(out)
    }
}

/// Parse raw bytes into a short-format C-APDU
///
/// - Case 1: CLA INS P1 P2
/// - Case 2: CLA INS P1 P2 Le
/// - Case 3: CLA INS P1 P2 Lc Data
/// - Case 4: CLA INS P1 P2 Lc Data Le
pub fn parse_c_apdu(data: &[u8]) -> Result<CApdu, ApduError> {
    if data.len() < 4 {
        return Err(ApduError::TooShort {
            expected: 4,
            actual: data.len(),
        });
    }

    let mut apdu = CApdu::new(data[0], data[1], data[2], data[3]);
    let remaining = &data[4..];

    if remaining.is_empty() {
        return Ok(apdu);
    }

    let first_byte = remaining[0];

    // Case 2: Le only, zero means 256
    if remaining.len() == 1 {
        apdu.le = Some(short_le(first_byte));
        return Ok(apdu);
    }

    let lc = first_byte as usize;
    if lc == 0 {
        return Err(ApduError::InvalidLength);
    }

    if remaining.len() == 1 + lc {
        apdu.data = remaining[1..1 + lc].to_vec();
        return Ok(apdu);
    }

    if remaining.len() == 1 + lc + 1 {
        apdu.data = remaining[1..1 + lc].to_vec();
        apdu.le = Some(short_le(remaining[1 + lc]));
        return Ok(apdu);
    }

    Err(ApduError::InvalidLength)
}

fn short_le(byte: u8) -> u16 {
    if byte == 0 {
        256
    } else {
        byte as u16
    }
}

impl DataObject for CApdu {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        Ok(parse_c_apdu(value)?)
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.extend(self.to_bytes()?);
        Ok(())
    }
}
