//! Envelopes
//!
//! An envelope carries data from the terminal (or the network through the
//! terminal) to the UICC outside the proactive command cycle: downloaded
//! short messages and cell broadcast pages, menu selections, call control
//! requests, events and timer expirations. Every envelope is a single
//! BER-TLV whose tag names its kind.
//!
//! # Example
//! ```ignore
//! use stk_codec::envelope::{encode_envelope, Envelope, EnvelopePayload};
//!
//! let envelope = Envelope::new(EnvelopePayload::MenuSelection {
//!     item_id: 2,
//!     help_request: false,
//! });
//! let bytes = encode_envelope(&envelope).unwrap();
//! assert_eq!(bytes, hex::decode("D30782020181900102").unwrap());
//! ```

mod decoder;
mod encoder;
mod event;

pub use decoder::{decode_envelope, decode_envelope_with};
pub use encoder::encode_envelope;
pub use event::Event;

use crate::objects::{Address, DeviceIdentity, LocationInfo, SsString, TimerValue, UssdString};

byte_enum! {
    /// Envelope wrapper tags (ETSI TS 101 220 §7.2)
    pub enum EnvelopeKind {
        SmsPpDownload = 0xD1,
        CbsPpDownload = 0xD2,
        MenuSelection = 0xD3,
        CallControl = 0xD4,
        MoShortMessageControl = 0xD5,
        EventDownload = 0xD6,
        TimerExpiration = 0xD7,
        UssdDownload = 0xD9,
    }
}

/// What a call control request is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallControlTarget {
    Address(Address),
    SsString(SsString),
    UssdString(UssdString),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopePayload {
    /// SMS-PP data download: the SMS-DELIVER TPDU is carried as is
    SmsPpDownload {
        /// Service centre address
        address: Option<Address>,
        tpdu: Vec<u8>,
    },
    CbsPpDownload {
        page: Vec<u8>,
    },
    MenuSelection {
        item_id: u8,
        help_request: bool,
    },
    CallControl {
        target: CallControlTarget,
        ccp: Option<Vec<u8>>,
        subaddress: Option<Vec<u8>>,
        location: Option<LocationInfo>,
        /// Second capability configuration parameters, only together with `ccp`
        ccp2: Option<Vec<u8>>,
        bc_repeat_indicator: Option<u8>,
    },
    MoShortMessageControl {
        /// RP destination address (the service centre)
        sc_address: Address,
        /// TP destination address
        destination: Address,
        location: Option<LocationInfo>,
    },
    EventDownload(Event),
    TimerExpiration {
        timer_id: u8,
        timer_value: TimerValue,
    },
    UssdDownload {
        ussd_string: UssdString,
    },
}

impl EnvelopePayload {
    pub fn kind(&self) -> EnvelopeKind {
        match self {
            EnvelopePayload::SmsPpDownload { .. } => EnvelopeKind::SmsPpDownload,
            EnvelopePayload::CbsPpDownload { .. } => EnvelopeKind::CbsPpDownload,
            EnvelopePayload::MenuSelection { .. } => EnvelopeKind::MenuSelection,
            EnvelopePayload::CallControl { .. } => EnvelopeKind::CallControl,
            EnvelopePayload::MoShortMessageControl { .. } => EnvelopeKind::MoShortMessageControl,
            EnvelopePayload::EventDownload(_) => EnvelopeKind::EventDownload,
            EnvelopePayload::TimerExpiration { .. } => EnvelopeKind::TimerExpiration,
            EnvelopePayload::UssdDownload { .. } => EnvelopeKind::UssdDownload,
        }
    }

    /// Device the envelope normally originates from
    pub fn default_source(&self) -> DeviceIdentity {
        match self {
            EnvelopePayload::SmsPpDownload { .. }
            | EnvelopePayload::CbsPpDownload { .. }
            | EnvelopePayload::UssdDownload { .. } => DeviceIdentity::Network,
            EnvelopePayload::MenuSelection { .. } => DeviceIdentity::Keypad,
            EnvelopePayload::EventDownload(event) => event.default_source(),
            _ => DeviceIdentity::Terminal,
        }
    }
}

/// An envelope addressed to the UICC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub src: DeviceIdentity,
    pub dst: DeviceIdentity,
    pub payload: EnvelopePayload,
}

impl Envelope {
    /// An envelope from the payload's usual source to the UICC
    pub fn new(payload: EnvelopePayload) -> Self {
        Self {
            src: payload.default_source(),
            dst: DeviceIdentity::Uicc,
            payload,
        }
    }

    pub fn kind(&self) -> EnvelopeKind {
        self.payload.kind()
    }
}
