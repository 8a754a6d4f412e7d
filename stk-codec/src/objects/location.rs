//! Local information objects: location, IMEI/IMEISV, BCCH list, timing advance

use super::{expect_len, DataObject, ObjectError};

byte_enum! {
    /// Location status (TS 102.223 §8.27)
    pub enum LocationStatus {
        NormalService = 0x00,
        LimitedService = 0x01,
        NoService = 0x02,
    }
}

byte_object!(LocationStatus, "location status");

/// Cell identity variants, selected by the object length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellId {
    /// GERAN cell identity
    Gsm(u16),
    /// UTRAN cell identity with its extension
    Utran { ci: u16, extended: u16 },
    /// 28-bit E-UTRAN cell identity
    Eutran(u32),
}

/// Location information (§8.19)
///
/// Five bytes carry only MCC/MNC and LAC (or TAC). Seven bytes add a
/// GERAN cell id. Nine bytes carry either a UTRAN cell id plus extension,
/// or an E-UTRAN cell id whose last nibble is the 0xF filler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationInfo {
    pub mcc: String,
    pub mnc: String,
    pub lac: u16,
    pub cell_id: Option<CellId>,
}

fn digit(object: &'static str, nibble: u8) -> Result<char, ObjectError> {
    if nibble > 9 {
        return Err(ObjectError::InvalidValue {
            object,
            value: nibble,
        });
    }
    Ok((b'0' + nibble) as char)
}

fn nibble(object: &'static str, character: char) -> Result<u8, ObjectError> {
    character
        .to_digit(10)
        .map(|d| d as u8)
        .ok_or(ObjectError::InvalidCharacter { object, character })
}

/// Decode the 3-byte PLMN identity into (MCC, MNC)
fn decode_plmn(value: &[u8]) -> Result<(String, String), ObjectError> {
    const NAME: &str = "PLMN";
    let mut mcc = String::with_capacity(3);
    mcc.push(digit(NAME, value[0] & 0x0F)?);
    mcc.push(digit(NAME, value[0] >> 4)?);
    mcc.push(digit(NAME, value[1] & 0x0F)?);

    let mut mnc = String::with_capacity(3);
    mnc.push(digit(NAME, value[2] & 0x0F)?);
    mnc.push(digit(NAME, value[2] >> 4)?);
    if value[1] >> 4 != 0x0F {
        mnc.push(digit(NAME, value[1] >> 4)?);
    }
    Ok((mcc, mnc))
}

fn encode_plmn(mcc: &str, mnc: &str, out: &mut Vec<u8>) -> Result<(), ObjectError> {
    const NAME: &str = "PLMN";
    let mcc: Vec<u8> = mcc.chars().map(|c| nibble(NAME, c)).collect::<Result<_, _>>()?;
    let mnc: Vec<u8> = mnc.chars().map(|c| nibble(NAME, c)).collect::<Result<_, _>>()?;
    if mcc.len() != 3 {
        return Err(ObjectError::InvalidLength {
            object: "MCC",
            length: mcc.len(),
        });
    }
    if mnc.len() != 2 && mnc.len() != 3 {
        return Err(ObjectError::InvalidLength {
            object: "MNC",
            length: mnc.len(),
        });
    }

    let mnc3 = mnc.get(2).copied().unwrap_or(0x0F);
    out.push(mcc[0] | (mcc[1] << 4));
    out.push(mcc[2] | (mnc3 << 4));
    out.push(mnc[0] | (mnc[1] << 4));
    Ok(())
}

impl DataObject for LocationInfo {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        let cell_id = match value.len() {
            5 => None,
            7 => Some(CellId::Gsm(u16::from_be_bytes([value[5], value[6]]))),
            9 if value[8] & 0x0F == 0x0F => {
                let raw = u32::from_be_bytes([value[5], value[6], value[7], value[8]]);
                Some(CellId::Eutran(raw >> 4))
            }
            9 => Some(CellId::Utran {
                ci: u16::from_be_bytes([value[5], value[6]]),
                extended: u16::from_be_bytes([value[7], value[8]]),
            }),
            length => {
                return Err(ObjectError::InvalidLength {
                    object: "location information",
                    length,
                })
            }
        };

        let (mcc, mnc) = decode_plmn(&value[..3])?;
        Ok(Self {
            mcc,
            mnc,
            lac: u16::from_be_bytes([value[3], value[4]]),
            cell_id,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        encode_plmn(&self.mcc, &self.mnc, out)?;
        out.extend_from_slice(&self.lac.to_be_bytes());
        match self.cell_id {
            None => {}
            Some(CellId::Gsm(ci)) => out.extend_from_slice(&ci.to_be_bytes()),
            Some(CellId::Utran { ci, extended }) => {
                out.extend_from_slice(&ci.to_be_bytes());
                out.extend_from_slice(&extended.to_be_bytes());
            }
            Some(CellId::Eutran(eci)) => {
                if eci > 0x0FFF_FFFF {
                    return Err(ObjectError::InvalidLength {
                        object: "E-UTRAN cell identity",
                        length: 32,
                    });
                }
                out.extend_from_slice(&((eci << 4) | 0x0F).to_be_bytes());
            }
        }
        Ok(())
    }
}

/// Mobile identity digits (TS 24.008 §10.5.1.4): the first digit shares a
/// byte with the identity type, the rest follow two per byte
fn decode_identity(object: &'static str, value: &[u8]) -> Result<String, ObjectError> {
    let mut out = String::with_capacity(value.len() * 2);
    let mut nibbles = vec![value[0] >> 4];
    for &byte in &value[1..] {
        nibbles.push(byte & 0x0F);
        nibbles.push(byte >> 4);
    }
    for n in nibbles {
        if n == 0x0F {
            break;
        }
        out.push(digit(object, n)?);
    }
    Ok(out)
}

fn encode_identity(
    object: &'static str,
    identity_type: u8,
    digits: &str,
    out: &mut Vec<u8>,
) -> Result<(), ObjectError> {
    let nibbles: Vec<u8> = digits.chars().map(|c| nibble(object, c)).collect::<Result<_, _>>()?;
    let (&first, rest) = nibbles
        .split_first()
        .ok_or(ObjectError::InvalidLength { object, length: 0 })?;
    let odd = if nibbles.len() % 2 == 1 { 0x08 } else { 0x00 };
    out.push(identity_type | odd | (first << 4));
    for pair in rest.chunks(2) {
        let high = pair.get(1).copied().unwrap_or(0x0F);
        out.push(pair[0] | (high << 4));
    }
    Ok(())
}

/// IMEI (§8.20): 15 digits in 8 bytes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Imei(pub String);

impl DataObject for Imei {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("IMEI", value, 8)?;
        Ok(Self(decode_identity("IMEI", value)?))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        if self.0.len() != 15 {
            return Err(ObjectError::InvalidLength {
                object: "IMEI",
                length: self.0.len(),
            });
        }
        encode_identity("IMEI", 0x02, &self.0, out)
    }
}

/// IMEISV (§8.74): 16 digits in 9 bytes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Imeisv(pub String);

impl DataObject for Imeisv {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("IMEISV", value, 9)?;
        Ok(Self(decode_identity("IMEISV", value)?))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        if self.0.len() != 16 {
            return Err(ObjectError::InvalidLength {
                object: "IMEISV",
                length: self.0.len(),
            });
        }
        encode_identity("IMEISV", 0x03, &self.0, out)
    }
}

/// BCCH channel list (§8.29): 10-bit ARFCNs packed back to back
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BcchChannelList(pub Vec<u16>);

impl DataObject for BcchChannelList {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        let count = value.len() * 8 / 10;
        let mut channels = Vec::with_capacity(count);
        for i in 0..count {
            let bit = i * 10;
            let byte = bit / 8;
            let shift = bit % 8;
            let hi = value[byte] as u16;
            let lo = value.get(byte + 1).copied().unwrap_or(0) as u16;
            let word = (hi << 8) | lo;
            channels.push((word >> (6 - shift)) & 0x03FF);
        }
        Ok(Self(channels))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        let mut packed = vec![0u8; (self.0.len() * 10 + 7) / 8];
        for (i, &arfcn) in self.0.iter().enumerate() {
            if arfcn > 0x03FF {
                return Err(ObjectError::InvalidLength {
                    object: "ARFCN",
                    length: arfcn as usize,
                });
            }
            let bit = i * 10;
            let byte = bit / 8;
            let shift = bit % 8;
            let word = arfcn << (6 - shift);
            packed[byte] |= (word >> 8) as u8;
            if let Some(next) = packed.get_mut(byte + 1) {
                *next |= word as u8;
            }
        }
        out.extend(packed);
        Ok(())
    }
}

/// Timing advance (§8.46)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimingAdvance {
    /// 0x00 idle, 0x01 not idle
    pub me_status: u8,
    pub advance: u8,
}

impl DataObject for TimingAdvance {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("timing advance", value, 2)?;
        Ok(Self {
            me_status: value[0],
            advance: value[1],
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.extend_from_slice(&[self.me_status, self.advance]);
        Ok(())
    }
}
