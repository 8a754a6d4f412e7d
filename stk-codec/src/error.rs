//! Errors of the outbound encoders and their symmetric decoders

use thiserror::Error;

use crate::command::{CommandType, ParseError};
use crate::objects::ObjectError;
use crate::tlv::TlvError;

/// A response or envelope value that cannot be put on the wire
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Payload does not belong to {0:?}")]
    PayloadMismatch(CommandType),

    #[error("Unknown command type 0x{0:02X}")]
    UnknownCommandType(u8),

    #[error("Result 0x{0:02X} requires additional information")]
    MissingAdditionalInfo(u8),

    #[error("Missing {0}")]
    MissingObject(&'static str),

    #[error("Invalid combination: {0}")]
    InvalidCombination(&'static str),

    #[error("Object error: {0}")]
    Object(#[from] ObjectError),

    #[error("TLV error: {0}")]
    Tlv(#[from] TlvError),
}

/// Bytes that do not form a terminal response or envelope
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Malformed PDU: {0}")]
    Malformed(#[from] TlvError),

    #[error("Unexpected wrapper tag 0x{0:02X}")]
    UnexpectedWrapper(u8),

    #[error("Missing {0}")]
    MissingObject(&'static str),

    #[error("Unknown command type 0x{0:02X}")]
    UnknownCommandType(u8),

    #[error("Objects not understood: {0}")]
    Objects(#[from] ParseError),

    #[error("Object error: {0}")]
    Object(#[from] ObjectError),
}
