//! Shared data-object codecs
//!
//! Every COMPREHENSION-TLV value that appears in more than one command,
//! response or envelope has a typed representation here with a decoder
//! for the raw value bytes and an encoder that appends them to a buffer.
//! Tags and the comprehension-required flag are the caller's business;
//! these codecs only ever see the value.

mod address;
mod bip;
mod item;
mod location;
mod misc;
mod text;
mod time;

pub use address::{Address, DtmfString, SsString};
pub use bip::{
    BearerDescription, ChannelState, ChannelStatus, GprsBearer, NetworkAccessName, OtherAddress,
    TransportLevel, TransportProtocol,
};
pub use item::{IconId, Item, ItemIconIdList, ResponseLength};
pub use location::{
    BcchChannelList, CellId, Imei, Imeisv, LocationInfo, LocationStatus, TimingAdvance,
};
pub use misc::{
    Aid, BrowserTerminationCause, CardReaderStatus, DeviceIdentities, DeviceIdentity, EventList,
    EventType, FileList, FrameId, GeneralResult, Language, ResultType, Tone,
};
pub use text::{
    decode_alpha_id, decode_text_string, encode_alpha_id, encode_text_string, TextAttribute,
    TextFormat, UssdString,
};
pub use time::{DateTimeTimezone, Duration, TimeUnit, TimerValue};

use thiserror::Error;

use crate::apdu::ApduError;
use crate::charset::CharsetError;
use crate::tlv::{TlvBuilder, TlvError};

/// A data object value that could not be decoded or encoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    #[error("{object}: invalid length {length}")]
    InvalidLength { object: &'static str, length: usize },

    #[error("{object}: invalid value 0x{value:02X}")]
    InvalidValue { object: &'static str, value: u8 },

    #[error("{object}: invalid character {character:?}")]
    InvalidCharacter { object: &'static str, character: char },

    #[error("{object}: declared {declared} entries, found {found}")]
    CountMismatch {
        object: &'static str,
        declared: usize,
        found: usize,
    },

    #[error("Charset error: {0}")]
    Charset(#[from] CharsetError),

    #[error("APDU error: {0}")]
    Apdu(#[from] ApduError),

    #[error("TLV error: {0}")]
    Tlv(#[from] TlvError),
}

/// A typed data-object value
pub trait DataObject: Sized {
    /// Decode from the raw value bytes
    fn decode(value: &[u8]) -> Result<Self, ObjectError>;

    /// Append the raw value bytes to `out`
    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError>;

    /// Encode into a fresh buffer
    fn to_value(&self) -> Result<Vec<u8>, ObjectError> {
        let mut out = Vec::new();
        self.encode(&mut out)?;
        Ok(out)
    }
}

/// Fail with `InvalidLength` unless `value` has exactly `length` bytes
pub(crate) fn expect_len(object: &'static str, value: &[u8], length: usize) -> Result<(), ObjectError> {
    if value.len() != length {
        return Err(ObjectError::InvalidLength {
            object,
            length: value.len(),
        });
    }
    Ok(())
}

/// Single-byte values (item identifier, timer identifier, buffer-size
/// style counters, cause bytes and the like)
impl DataObject for u8 {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("byte", value, 1)?;
        Ok(value[0])
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.push(*self);
        Ok(())
    }
}

/// Two-byte big-endian values (buffer size)
impl DataObject for u16 {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("u16", value, 2)?;
        Ok(u16::from_be_bytes([value[0], value[1]]))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.extend_from_slice(&self.to_be_bytes());
        Ok(())
    }
}

/// Opaque values carried through unchanged
impl DataObject for Vec<u8> {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        Ok(value.to_vec())
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.extend_from_slice(self);
        Ok(())
    }
}

/// Typed pushes onto a [`TlvBuilder`]
pub trait ObjectWriter {
    /// Encode `object` and append it under `tag`
    fn put<T: DataObject>(&mut self, tag: u16, cr: bool, object: &T) -> Result<(), ObjectError>;

    /// Append `object` under `tag` if present
    fn put_opt<T: DataObject>(
        &mut self,
        tag: u16,
        cr: bool,
        object: Option<&T>,
    ) -> Result<(), ObjectError> {
        match object {
            Some(object) => self.put(tag, cr, object),
            None => Ok(()),
        }
    }
}

impl ObjectWriter for TlvBuilder {
    fn put<T: DataObject>(&mut self, tag: u16, cr: bool, object: &T) -> Result<(), ObjectError> {
        let value = object.to_value()?;
        self.push(tag, cr, &value)?;
        Ok(())
    }
}
