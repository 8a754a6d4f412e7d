//! Proactive command parsing
//!
//! A proactive command arrives from the UICC wrapped in a 0xD0 BER-TLV.
//! The first two objects are always Command Details and Device
//! Identities; the objects after them depend on the command type and are
//! matched against that command's ordered object list.
//!
//! # Example
//! ```ignore
//! use stk_codec::command::{parse_proactive_command, CommandType};
//!
//! let pdu = hex::decode("D009810301010482028182").unwrap();
//! let command = parse_proactive_command(&pdu).unwrap();
//! assert_eq!(command.command_type, CommandType::Refresh);
//! assert!(command.status.is_ok());
//! ```

mod parser;
mod payloads;
pub(crate) mod walker;

pub use parser::parse_proactive_command_with;
pub use payloads::*;

use thiserror::Error;

use crate::config::CodecConfig;
use crate::objects::{expect_len, DataObject, DeviceIdentity, ObjectError};
use crate::tlv::TlvError;

byte_enum! {
    /// Type of command (TS 102.223 §9.4)
    pub enum CommandType {
        Refresh = 0x01,
        MoreTime = 0x02,
        PollInterval = 0x03,
        PollingOff = 0x04,
        SetupEventList = 0x05,
        SetupCall = 0x10,
        SendSs = 0x11,
        SendUssd = 0x12,
        SendSms = 0x13,
        SendDtmf = 0x14,
        LaunchBrowser = 0x15,
        PlayTone = 0x20,
        DisplayText = 0x21,
        GetInkey = 0x22,
        GetInput = 0x23,
        SelectItem = 0x24,
        SetupMenu = 0x25,
        ProvideLocalInfo = 0x26,
        TimerManagement = 0x27,
        SetupIdleModeText = 0x28,
        PerformCardApdu = 0x30,
        PowerOnCard = 0x31,
        PowerOffCard = 0x32,
        GetReaderStatus = 0x33,
        RunAtCommand = 0x34,
        LanguageNotification = 0x35,
        OpenChannel = 0x40,
        CloseChannel = 0x41,
        ReceiveData = 0x42,
        SendData = 0x43,
        GetChannelStatus = 0x44,
        ServiceSearch = 0x45,
        GetServiceInfo = 0x46,
        DeclareService = 0x47,
        SetFrames = 0x50,
        GetFramesStatus = 0x51,
        RetrieveMms = 0x60,
        SubmitMms = 0x61,
        DisplayMms = 0x62,
        Activate = 0x70,
    }
}

impl CommandType {
    pub fn is_known(&self) -> bool {
        !matches!(self, CommandType::Unknown(_))
    }
}

/// Command qualifier bits used outside the parser
pub mod qualifier {
    pub const DISPLAY_TEXT_HIGH_PRIORITY: u8 = 0x01;
    pub const DISPLAY_TEXT_WAIT_FOR_USER: u8 = 0x80;

    pub const GET_INKEY_UCS2: u8 = 0x02;
    pub const GET_INKEY_YES_NO: u8 = 0x04;
    pub const GET_INKEY_IMMEDIATE: u8 = 0x08;

    pub const GET_INPUT_UCS2: u8 = 0x02;
    pub const GET_INPUT_NO_ECHO: u8 = 0x04;
    pub const GET_INPUT_PACKED: u8 = 0x08;

    pub const HELP_AVAILABLE: u8 = 0x80;
}

/// Command details (§8.6): number, type and qualifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandDetails {
    pub number: u8,
    pub command_type: CommandType,
    pub qualifier: u8,
}

impl CommandDetails {
    pub fn new(number: u8, command_type: CommandType, qualifier: u8) -> Self {
        Self {
            number,
            command_type,
            qualifier,
        }
    }
}

impl DataObject for CommandDetails {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("command details", value, 3)?;
        Ok(Self {
            number: value[0],
            command_type: value[1].into(),
            qualifier: value[2],
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.extend_from_slice(&[self.number, self.command_type.into(), self.qualifier]);
        Ok(())
    }
}

/// Why a command could not be accepted
///
/// These map one to one onto the general results a terminal reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Required values are missing")]
    MissingValue,

    #[error("Command data not understood")]
    DataNotUnderstood,

    #[error("Command type not understood")]
    TypeNotUnderstood,

    #[error("Malformed object stream: {0}")]
    Malformed(#[from] TlvError),
}

impl From<ObjectError> for ParseError {
    fn from(_: ObjectError) -> Self {
        ParseError::DataNotUnderstood
    }
}

/// Outcome of parsing a command's objects
pub type ParseResult = Result<(), ParseError>;

/// A PDU that does not yield any command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Malformed PDU: {0}")]
    Malformed(#[from] TlvError),

    #[error("Not a proactive command: tag 0x{0:02X}")]
    NotProactiveCommand(u8),

    #[error("Command details missing")]
    MissingCommandDetails,

    #[error("Invalid command details length {0}")]
    InvalidCommandDetails(usize),
}

/// A decoded proactive command
///
/// The header fields are always filled in. `src`/`dst` are
/// `DeviceIdentity::Unknown(0)` when the Device Identities object is
/// missing. When `status` is an error the payload is `CommandPayload::None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProactiveCommand {
    pub number: u8,
    pub command_type: CommandType,
    pub qualifier: u8,
    pub src: DeviceIdentity,
    pub dst: DeviceIdentity,
    pub status: ParseResult,
    pub payload: CommandPayload,
}

impl ProactiveCommand {
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    pub fn details(&self) -> CommandDetails {
        CommandDetails::new(self.number, self.command_type, self.qualifier)
    }
}

/// Parse a proactive command with the default configuration
pub fn parse_proactive_command(pdu: &[u8]) -> Result<ProactiveCommand, CommandError> {
    parse_proactive_command_with(pdu, &CodecConfig::default())
}
