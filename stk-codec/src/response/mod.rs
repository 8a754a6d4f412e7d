//! Terminal responses
//!
//! A terminal response answers one proactive command. It starts with the
//! command details of that command, the device identities and the general
//! result, followed by the command-specific objects. There is no outer
//! BER-TLV wrapper.
//!
//! # Example
//! ```ignore
//! use stk_codec::command::CommandType;
//! use stk_codec::objects::{DeviceIdentity, GeneralResult};
//! use stk_codec::response::{encode_terminal_response, TerminalResponse};
//!
//! let response = TerminalResponse::new(
//!     1,
//!     CommandType::DisplayText,
//!     0x80,
//!     GeneralResult::success(),
//! );
//! let bytes = encode_terminal_response(&response).unwrap();
//! assert_eq!(bytes, hex::decode("810301218082028281830100").unwrap());
//! ```

mod decoder;
mod encoder;
mod local_info;

pub use decoder::{decode_terminal_response, decode_terminal_response_with};
pub use encoder::encode_terminal_response;
pub use local_info::{LocalInfo, LocalInfoKind};

use crate::apdu::RApdu;
use crate::command::{CommandType, ProactiveCommand};
use crate::objects::{
    BearerDescription, CardReaderStatus, ChannelStatus, DeviceIdentity, Duration, GeneralResult,
    TimerValue, UssdString,
};

/// The user's answer to GET INKEY or GET INPUT and how to code it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerText {
    /// GSM default alphabet, 7-bit packed (DCS 0x00)
    Packed(String),
    /// GSM default alphabet, one septet per byte (DCS 0x04)
    Unpacked(String),
    /// UCS2 (DCS 0x08)
    Ucs2(String),
    /// Unpacked when every character is in the GSM alphabet, else UCS2
    Auto(String),
    /// Answer to a yes/no GET INKEY
    YesNo(bool),
}

impl AnswerText {
    /// The answer as text; yes/no answers read "Yes" or "No"
    pub fn text(&self) -> &str {
        match self {
            AnswerText::Packed(s)
            | AnswerText::Unpacked(s)
            | AnswerText::Ucs2(s)
            | AnswerText::Auto(s) => s,
            AnswerText::YesNo(true) => "Yes",
            AnswerText::YesNo(false) => "No",
        }
    }
}

/// Command-specific objects of a terminal response
///
/// Every field is optional because failed commands usually carry nothing.
/// `None` is valid for every command type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponsePayload {
    #[default]
    None,
    GetInkey {
        text: Option<AnswerText>,
        duration: Option<Duration>,
    },
    GetInput {
        text: Option<AnswerText>,
    },
    PollInterval {
        duration: Option<Duration>,
    },
    SelectItem {
        item_id: Option<u8>,
    },
    SetupCall {
        requested_action: Option<Vec<u8>>,
        second_result: Option<GeneralResult>,
    },
    SendUssd {
        text: Option<UssdString>,
    },
    ProvideLocalInfo(LocalInfo),
    TimerManagement {
        timer_id: Option<u8>,
        timer_value: Option<TimerValue>,
    },
    PerformCardApdu {
        r_apdu: Option<RApdu>,
    },
    PowerOnCard {
        atr: Option<Vec<u8>>,
    },
    GetReaderStatus {
        status: Option<CardReaderStatus>,
        reader_id: Option<Vec<u8>>,
    },
    RunAtCommand {
        at_response: Option<String>,
    },
    OpenChannel {
        channel_status: Option<ChannelStatus>,
        bearer: Option<BearerDescription>,
        buffer_size: Option<u16>,
    },
    ReceiveData {
        data: Option<Vec<u8>>,
        remaining: Option<u8>,
    },
    SendData {
        available: Option<u8>,
    },
    GetChannelStatus {
        channels: Vec<ChannelStatus>,
    },
    GetServiceInfo {
        service_record: Option<Vec<u8>>,
    },
    GetFramesStatus {
        frames_info: Option<Vec<u8>>,
    },
}

impl ResponsePayload {
    /// Command type this payload answers, if it is type-specific
    pub fn command_type(&self) -> Option<CommandType> {
        let command_type = match self {
            ResponsePayload::None => return None,
            ResponsePayload::GetInkey { .. } => CommandType::GetInkey,
            ResponsePayload::GetInput { .. } => CommandType::GetInput,
            ResponsePayload::PollInterval { .. } => CommandType::PollInterval,
            ResponsePayload::SelectItem { .. } => CommandType::SelectItem,
            ResponsePayload::SetupCall { .. } => CommandType::SetupCall,
            ResponsePayload::SendUssd { .. } => CommandType::SendUssd,
            ResponsePayload::ProvideLocalInfo(_) => CommandType::ProvideLocalInfo,
            ResponsePayload::TimerManagement { .. } => CommandType::TimerManagement,
            ResponsePayload::PerformCardApdu { .. } => CommandType::PerformCardApdu,
            ResponsePayload::PowerOnCard { .. } => CommandType::PowerOnCard,
            ResponsePayload::GetReaderStatus { .. } => CommandType::GetReaderStatus,
            ResponsePayload::RunAtCommand { .. } => CommandType::RunAtCommand,
            ResponsePayload::OpenChannel { .. } => CommandType::OpenChannel,
            ResponsePayload::ReceiveData { .. } => CommandType::ReceiveData,
            ResponsePayload::SendData { .. } => CommandType::SendData,
            ResponsePayload::GetChannelStatus { .. } => CommandType::GetChannelStatus,
            ResponsePayload::GetServiceInfo { .. } => CommandType::GetServiceInfo,
            ResponsePayload::GetFramesStatus { .. } => CommandType::GetFramesStatus,
        };
        Some(command_type)
    }
}

/// A terminal response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalResponse {
    pub number: u8,
    pub command_type: CommandType,
    pub qualifier: u8,
    pub src: DeviceIdentity,
    pub dst: DeviceIdentity,
    pub result: GeneralResult,
    pub payload: ResponsePayload,
}

impl TerminalResponse {
    /// A response from the terminal to the UICC without payload
    pub fn new(number: u8, command_type: CommandType, qualifier: u8, result: GeneralResult) -> Self {
        Self {
            number,
            command_type,
            qualifier,
            src: DeviceIdentity::Terminal,
            dst: DeviceIdentity::Uicc,
            result,
            payload: ResponsePayload::None,
        }
    }

    /// A response echoing the details of `command`
    pub fn for_command(command: &ProactiveCommand, result: GeneralResult) -> Self {
        Self::new(command.number, command.command_type, command.qualifier, result)
    }

    pub fn with_payload(mut self, payload: ResponsePayload) -> Self {
        self.payload = payload;
        self
    }
}
