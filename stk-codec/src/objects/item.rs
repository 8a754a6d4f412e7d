//! Menu objects: item, icon identifiers, response length

use super::text::{decode_alpha_id, encode_alpha_id};
use super::{expect_len, DataObject, ObjectError};

/// One menu entry (TS 102.223 §8.9)
///
/// The identifier is never 0. Empty item values are handled by the item
/// list rules of the command parser, not here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Item {
    pub id: u8,
    pub text: String,
}

impl Item {
    pub fn new(id: u8, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

impl DataObject for Item {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        if value.len() < 2 {
            return Err(ObjectError::InvalidLength {
                object: "item",
                length: value.len(),
            });
        }
        if value[0] == 0 {
            return Err(ObjectError::InvalidValue {
                object: "item identifier",
                value: 0,
            });
        }
        Ok(Self {
            id: value[0],
            text: decode_alpha_id(&value[1..])?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        if self.id == 0 {
            return Err(ObjectError::InvalidValue {
                object: "item identifier",
                value: 0,
            });
        }
        out.push(self.id);
        encode_alpha_id(&self.text, out);
        Ok(())
    }
}

/// Icon identifier (§8.31)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IconId {
    pub qualifier: u8,
    pub id: u8,
}

impl IconId {
    /// Bit 1 of the qualifier clear: the icon replaces the text
    pub fn is_self_explanatory(&self) -> bool {
        self.qualifier & 0x01 == 0
    }
}

impl DataObject for IconId {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("icon identifier", value, 2)?;
        Ok(Self {
            qualifier: value[0],
            id: value[1],
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.extend_from_slice(&[self.qualifier, self.id]);
        Ok(())
    }
}

/// Item icon identifier list (§8.32): one qualifier for every item's icon
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemIconIdList {
    pub qualifier: u8,
    pub ids: Vec<u8>,
}

impl DataObject for ItemIconIdList {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        match value.split_first() {
            Some((&qualifier, ids)) if !ids.is_empty() => Ok(Self {
                qualifier,
                ids: ids.to_vec(),
            }),
            _ => Err(ObjectError::InvalidLength {
                object: "item icon identifier list",
                length: value.len(),
            }),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.push(self.qualifier);
        out.extend_from_slice(&self.ids);
        Ok(())
    }
}

/// Response length (§8.11)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponseLength {
    pub min: u8,
    pub max: u8,
}

impl DataObject for ResponseLength {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("response length", value, 2)?;
        Ok(Self {
            min: value[0],
            max: value[1],
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.extend_from_slice(&[self.min, self.max]);
        Ok(())
    }
}
