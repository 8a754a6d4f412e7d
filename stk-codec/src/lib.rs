//! SIM Application Toolkit codec
//!
//! Parses proactive commands sent by the UICC, and encodes the terminal
//! responses and envelopes the terminal sends back (ETSI TS 102.223,
//! 3GPP TS 31.111). Every PDU is a sequence of COMPREHENSION-TLV data
//! objects; proactive commands and envelopes are additionally wrapped in
//! a single BER-TLV.
//!
//! The codec is pure: no I/O, no shared state. [`StkCodec`] carries a
//! [`CodecConfig`]; the free functions use the default configuration.

#[macro_use]
mod macros;

// Wire layer
pub mod apdu;
pub mod charset;
pub mod tlv;

// Toolkit layer
pub mod command;
pub mod config;
pub mod envelope;
pub mod error;
pub mod objects;
pub mod response;

pub use command::{
    parse_proactive_command, CommandError, CommandPayload, CommandType, ParseError, ParseResult,
    ProactiveCommand,
};
pub use config::{CodecConfig, ConfigError};
pub use envelope::{decode_envelope, encode_envelope, Envelope, EnvelopePayload, Event};
pub use error::{DecodeError, EncodeError};
pub use response::{
    decode_terminal_response, encode_terminal_response, AnswerText, ResponsePayload,
    TerminalResponse,
};

/// Codec entry points bound to one configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct StkCodec {
    config: CodecConfig,
}

impl StkCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Parse a proactive command
    ///
    /// A command is returned whenever its Command Details could be read;
    /// `status` then says whether the rest was understood.
    pub fn parse_proactive_command(&self, pdu: &[u8]) -> Result<ProactiveCommand, CommandError> {
        command::parse_proactive_command_with(pdu, &self.config)
    }

    pub fn encode_terminal_response(
        &self,
        response: &TerminalResponse,
    ) -> Result<Vec<u8>, EncodeError> {
        response::encode_terminal_response(response)
    }

    pub fn decode_terminal_response(&self, bytes: &[u8]) -> Result<TerminalResponse, DecodeError> {
        response::decode_terminal_response_with(bytes, &self.config)
    }

    pub fn encode_envelope(&self, envelope: &Envelope) -> Result<Vec<u8>, EncodeError> {
        envelope::encode_envelope(envelope)
    }

    pub fn decode_envelope(&self, bytes: &[u8]) -> Result<Envelope, DecodeError> {
        envelope::decode_envelope_with(bytes, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{DeviceIdentity, GeneralResult, ResultType};

    #[test]
    fn test_command_response_cycle() {
        let codec = StkCodec::default();
        let pdu = hex::decode("D009810301010482028182").unwrap();
        let command = codec.parse_proactive_command(&pdu).unwrap();
        assert!(command.is_ok());
        assert_eq!(command.command_type, CommandType::Refresh);
        assert_eq!(command.src, DeviceIdentity::Uicc);
        assert_eq!(command.dst, DeviceIdentity::Terminal);

        let response = TerminalResponse::for_command(&command, GeneralResult::success());
        let bytes = codec.encode_terminal_response(&response).unwrap();
        assert_eq!(bytes, hex::decode("810301010482028281830100").unwrap());
        assert_eq!(codec.decode_terminal_response(&bytes).unwrap(), response);
    }

    #[test]
    fn test_rejected_command_response() {
        let pdu = hex::decode("D00B8103012500820281828500").unwrap();
        let command = parse_proactive_command(&pdu).unwrap();
        assert_eq!(command.status, Err(ParseError::MissingValue));

        let response = TerminalResponse::for_command(
            &command,
            GeneralResult::new(ResultType::MissingValue),
        );
        let bytes = encode_terminal_response(&response).unwrap();
        assert_eq!(bytes, hex::decode("810301250082028281830136").unwrap());
    }

    #[test]
    fn test_strict_codec() {
        let codec = StkCodec::new(CodecConfig {
            strict_length_form: true,
            ..CodecConfig::default()
        });
        assert!(codec.config().strict_length_form);
        let envelope = hex::decode("D3810782020181900102").unwrap();
        assert!(matches!(
            codec.decode_envelope(&envelope),
            Err(DecodeError::Malformed(_))
        ));
        assert!(decode_envelope(&envelope).is_ok());
    }

    #[test]
    fn test_envelope_cycle() {
        let codec = StkCodec::default();
        let envelope = Envelope::new(EnvelopePayload::EventDownload(Event::UserActivity));
        let bytes = codec.encode_envelope(&envelope).unwrap();
        assert_eq!(bytes, hex::decode("D60799010482028281").unwrap());
        assert_eq!(codec.decode_envelope(&bytes).unwrap(), envelope);
    }
}
