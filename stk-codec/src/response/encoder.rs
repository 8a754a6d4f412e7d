//! Terminal response encoder

use log::{debug, warn};

use super::{AnswerText, ResponsePayload, TerminalResponse};
use crate::charset::{is_gsm_representable, Charset};
use crate::command::{CommandDetails, CommandType};
use crate::error::EncodeError;
use crate::objects::{encode_text_string, DeviceIdentities, ObjectWriter, ResultType};
use crate::tlv::{hexify, tags, TlvBuilder};

/// Encode a terminal response
///
/// The response is validated first; nothing is emitted for a value the
/// UICC could not make sense of.
pub fn encode_terminal_response(response: &TerminalResponse) -> Result<Vec<u8>, EncodeError> {
    if let Err(e) = validate(response) {
        warn!("Rejecting terminal response for {:?}: {}", response.command_type, e);
        return Err(e);
    }

    let mut builder = TlvBuilder::new();
    builder.put(
        tags::COMMAND_DETAILS,
        true,
        &CommandDetails::new(response.number, response.command_type, response.qualifier),
    )?;
    builder.put(
        tags::DEVICE_IDENTITIES,
        true,
        &DeviceIdentities::new(response.src, response.dst),
    )?;
    builder.put(tags::RESULT, true, &response.result)?;
    encode_payload(&response.payload, &mut builder)?;

    let bytes = builder.build();
    debug!("Terminal response: {}", hexify(&bytes));
    Ok(bytes)
}

fn validate(response: &TerminalResponse) -> Result<(), EncodeError> {
    let command_type = response.command_type;
    if !command_type.is_known() {
        return Err(EncodeError::UnknownCommandType(command_type.into()));
    }
    if let Some(payload_type) = response.payload.command_type() {
        if payload_type != command_type {
            return Err(EncodeError::PayloadMismatch(command_type));
        }
    }

    let result_type = response.result.result_type;
    if result_type.requires_additional_info() && response.result.additional.is_empty() {
        return Err(EncodeError::MissingAdditionalInfo(result_type.into()));
    }

    if result_type.is_success() {
        return check_success_data(response);
    }

    match &response.payload {
        ResponsePayload::GetInkey { text: Some(_), .. }
        | ResponsePayload::GetInput { text: Some(_) } => {
            Err(EncodeError::InvalidCombination("answer text with an unsuccessful result"))
        }
        ResponsePayload::SelectItem { item_id: Some(_) }
            if result_type != ResultType::HelpRequested =>
        {
            Err(EncodeError::InvalidCombination("item identifier with an unsuccessful result"))
        }
        _ => Ok(()),
    }
}

/// Data a successful response to some commands cannot do without
fn check_success_data(response: &TerminalResponse) -> Result<(), EncodeError> {
    let missing = match (response.command_type, &response.payload) {
        (CommandType::SelectItem, ResponsePayload::SelectItem { item_id: Some(_) }) => None,
        (CommandType::SelectItem, _) => Some("item identifier"),
        (
            CommandType::TimerManagement,
            ResponsePayload::TimerManagement {
                timer_id: Some(_), ..
            },
        ) => None,
        (CommandType::TimerManagement, _) => Some("timer identifier"),
        (CommandType::PollInterval, ResponsePayload::PollInterval { duration: Some(_) }) => None,
        (CommandType::PollInterval, _) => Some("duration"),
        _ => None,
    };
    match missing {
        Some(object) => Err(EncodeError::MissingObject(object)),
        None => Ok(()),
    }
}

/// Text string value for an answer
fn answer_value(answer: &AnswerText) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    let (coding, text) = match answer {
        AnswerText::YesNo(yes) => {
            out.extend_from_slice(&[Charset::Gsm8.dcs(), u8::from(*yes)]);
            return Ok(out);
        }
        AnswerText::Packed(text) => (Charset::Gsm7, text),
        AnswerText::Unpacked(text) => (Charset::Gsm8, text),
        AnswerText::Ucs2(text) => (Charset::Ucs2, text),
        AnswerText::Auto(text) if is_gsm_representable(text) => (Charset::Gsm8, text),
        AnswerText::Auto(text) => (Charset::Ucs2, text),
    };
    encode_text_string(coding, text, &mut out)?;
    Ok(out)
}

fn encode_payload(payload: &ResponsePayload, builder: &mut TlvBuilder) -> Result<(), EncodeError> {
    match payload {
        ResponsePayload::None => {}
        ResponsePayload::GetInkey { text, duration } => {
            if let Some(text) = text {
                builder.push(tags::TEXT_STRING, true, &answer_value(text)?)?;
            }
            builder.put_opt(tags::DURATION, false, duration.as_ref())?;
        }
        ResponsePayload::GetInput { text } => {
            if let Some(text) = text {
                builder.push(tags::TEXT_STRING, true, &answer_value(text)?)?;
            }
        }
        ResponsePayload::PollInterval { duration } => {
            builder.put_opt(tags::DURATION, true, duration.as_ref())?;
        }
        ResponsePayload::SelectItem { item_id } => {
            builder.put_opt(tags::ITEM_ID, true, item_id.as_ref())?;
        }
        ResponsePayload::SetupCall {
            requested_action,
            second_result,
        } => {
            builder.put_opt(
                tags::CALL_CONTROL_REQUESTED_ACTION,
                true,
                requested_action.as_ref(),
            )?;
            builder.put_opt(tags::RESULT, true, second_result.as_ref())?;
        }
        ResponsePayload::SendUssd { text } => {
            builder.put_opt(tags::TEXT_STRING, true, text.as_ref())?;
        }
        ResponsePayload::ProvideLocalInfo(info) => info.encode(builder)?,
        ResponsePayload::TimerManagement {
            timer_id,
            timer_value,
        } => {
            builder.put_opt(tags::TIMER_ID, true, timer_id.as_ref())?;
            builder.put_opt(tags::TIMER_VALUE, true, timer_value.as_ref())?;
        }
        ResponsePayload::PerformCardApdu { r_apdu } => {
            builder.put_opt(tags::R_APDU, true, r_apdu.as_ref())?;
        }
        ResponsePayload::PowerOnCard { atr } => {
            builder.put_opt(tags::CARD_ATR, true, atr.as_ref())?;
        }
        ResponsePayload::GetReaderStatus { status, reader_id } => {
            builder.put_opt(tags::CARD_READER_STATUS, true, status.as_ref())?;
            builder.put_opt(tags::CARD_READER_ID, false, reader_id.as_ref())?;
        }
        ResponsePayload::RunAtCommand { at_response } => {
            if let Some(at_response) = at_response {
                builder.push(tags::AT_RESPONSE, true, at_response.as_bytes())?;
            }
        }
        ResponsePayload::OpenChannel {
            channel_status,
            bearer,
            buffer_size,
        } => {
            builder.put_opt(tags::CHANNEL_STATUS, true, channel_status.as_ref())?;
            builder.put_opt(tags::BEARER_DESCRIPTION, true, bearer.as_ref())?;
            builder.put_opt(tags::BUFFER_SIZE, true, buffer_size.as_ref())?;
        }
        ResponsePayload::ReceiveData { data, remaining } => {
            builder.put_opt(tags::CHANNEL_DATA, true, data.as_ref())?;
            builder.put_opt(tags::CHANNEL_DATA_LENGTH, true, remaining.as_ref())?;
        }
        ResponsePayload::SendData { available } => {
            builder.put_opt(tags::CHANNEL_DATA_LENGTH, true, available.as_ref())?;
        }
        ResponsePayload::GetChannelStatus { channels } => {
            for channel in channels {
                builder.put(tags::CHANNEL_STATUS, true, channel)?;
            }
        }
        ResponsePayload::GetServiceInfo { service_record } => {
            builder.put_opt(tags::SERVICE_RECORD, true, service_record.as_ref())?;
        }
        ResponsePayload::GetFramesStatus { frames_info } => {
            builder.put_opt(tags::FRAMES_INFO, true, frames_info.as_ref())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apdu::RApdu;
    use crate::objects::{
        ChannelState, ChannelStatus, Duration, GeneralResult, Language, ResultType, TimerValue,
    };
    use crate::response::LocalInfo;

    fn response(command_type: CommandType, qualifier: u8) -> TerminalResponse {
        TerminalResponse::new(1, command_type, qualifier, GeneralResult::success())
    }

    #[test]
    fn test_header_only() {
        let bytes = encode_terminal_response(&response(CommandType::PlayTone, 0x80)).unwrap();
        assert_eq!(bytes, hex::decode("810301208082028281830100").unwrap());

        let bytes = encode_terminal_response(&response(CommandType::DisplayText, 0x80)).unwrap();
        assert_eq!(bytes, hex::decode("810301218082028281830100").unwrap());
    }

    #[test]
    fn test_timer_management() {
        let tr = response(CommandType::TimerManagement, 0x02).with_payload(
            ResponsePayload::TimerManagement {
                timer_id: Some(1),
                timer_value: Some(TimerValue::new(0, 3, 59)),
            },
        );
        let bytes = encode_terminal_response(&tr).unwrap();
        assert!(bytes.ends_with(&hex::decode("a40101a503003095").unwrap()));
        assert_eq!(bytes.len(), 12 + 8);
    }

    #[test]
    fn test_get_inkey_yes_no() {
        let tr = response(CommandType::GetInkey, 0x04).with_payload(ResponsePayload::GetInkey {
            text: Some(AnswerText::YesNo(true)),
            duration: None,
        });
        let bytes = encode_terminal_response(&tr).unwrap();
        assert_eq!(bytes, hex::decode("8103012204820282818301008D020401").unwrap());
    }

    #[test]
    fn test_get_inkey_with_duration() {
        let tr = response(CommandType::GetInkey, 0x00).with_payload(ResponsePayload::GetInkey {
            text: Some(AnswerText::Unpacked("+".to_string())),
            duration: Some(Duration::seconds(5)),
        });
        let bytes = encode_terminal_response(&tr).unwrap();
        assert!(bytes.ends_with(&hex::decode("8D02042B04020105").unwrap()));
    }

    #[test]
    fn test_answer_codings() {
        let packed = answer_value(&AnswerText::Packed("abc".to_string())).unwrap();
        assert_eq!(packed, hex::decode("0061F118").unwrap());

        let unpacked = answer_value(&AnswerText::Unpacked("abc".to_string())).unwrap();
        assert_eq!(unpacked, hex::decode("04616263").unwrap());

        let ucs2 = answer_value(&AnswerText::Ucs2("ab".to_string())).unwrap();
        assert_eq!(ucs2, hex::decode("0800610062").unwrap());

        let auto = answer_value(&AnswerText::Auto("+".to_string())).unwrap();
        assert_eq!(auto, hex::decode("042B").unwrap());

        let auto = answer_value(&AnswerText::Auto("\u{4F60}".to_string())).unwrap();
        assert_eq!(auto, hex::decode("084F60").unwrap());

        let no = answer_value(&AnswerText::YesNo(false)).unwrap();
        assert_eq!(no, hex::decode("0400").unwrap());
    }

    #[test]
    fn test_packed_rejects_non_gsm() {
        let result = answer_value(&AnswerText::Packed("\u{4F60}".to_string()));
        assert!(matches!(result, Err(EncodeError::Object(_))));
    }

    #[test]
    fn test_select_item() {
        let tr = response(CommandType::SelectItem, 0x00)
            .with_payload(ResponsePayload::SelectItem { item_id: Some(2) });
        let bytes = encode_terminal_response(&tr).unwrap();
        assert_eq!(bytes, hex::decode("810301240082028281830100900102").unwrap());
    }

    #[test]
    fn test_select_item_help_request() {
        let mut tr = response(CommandType::SelectItem, 0x80)
            .with_payload(ResponsePayload::SelectItem { item_id: Some(3) });
        tr.result = GeneralResult::new(ResultType::HelpRequested);
        let bytes = encode_terminal_response(&tr).unwrap();
        assert_eq!(bytes, hex::decode("810301248082028281830113900103").unwrap());

        tr.result = GeneralResult::new(ResultType::GoBack);
        assert!(matches!(
            encode_terminal_response(&tr),
            Err(EncodeError::InvalidCombination(_))
        ));
    }

    #[test]
    fn test_answer_with_failure() {
        let mut tr = response(CommandType::GetInput, 0x00).with_payload(ResponsePayload::GetInput {
            text: Some(AnswerText::Unpacked("12".to_string())),
        });
        tr.result = GeneralResult::new(ResultType::UserTerminated);
        assert!(matches!(
            encode_terminal_response(&tr),
            Err(EncodeError::InvalidCombination(_))
        ));

        tr.payload = ResponsePayload::None;
        assert_eq!(
            encode_terminal_response(&tr).unwrap(),
            hex::decode("810301230082028281830110").unwrap()
        );
    }

    #[test]
    fn test_missing_success_data() {
        let tr = response(CommandType::SelectItem, 0x00);
        assert_eq!(
            encode_terminal_response(&tr),
            Err(EncodeError::MissingObject("item identifier"))
        );

        let tr = response(CommandType::PollInterval, 0x00)
            .with_payload(ResponsePayload::PollInterval { duration: None });
        assert_eq!(encode_terminal_response(&tr), Err(EncodeError::MissingObject("duration")));

        let tr = response(CommandType::TimerManagement, 0x00);
        assert_eq!(
            encode_terminal_response(&tr),
            Err(EncodeError::MissingObject("timer identifier"))
        );
    }

    #[test]
    fn test_additional_info_required() {
        let mut tr = response(CommandType::SetupCall, 0x00);
        tr.result = GeneralResult::new(ResultType::TerminalBusy);
        assert_eq!(encode_terminal_response(&tr), Err(EncodeError::MissingAdditionalInfo(0x20)));

        tr.result = GeneralResult::with_additional(ResultType::TerminalBusy, vec![0x02]);
        assert_eq!(
            encode_terminal_response(&tr).unwrap(),
            hex::decode("81030110008202828183022002").unwrap()
        );
    }

    #[test]
    fn test_payload_mismatch() {
        let tr = response(CommandType::DisplayText, 0x00)
            .with_payload(ResponsePayload::SelectItem { item_id: Some(1) });
        assert_eq!(
            encode_terminal_response(&tr),
            Err(EncodeError::PayloadMismatch(CommandType::DisplayText))
        );
    }

    #[test]
    fn test_unknown_command_type() {
        let tr = response(CommandType::Unknown(0x7E), 0x00);
        assert_eq!(encode_terminal_response(&tr), Err(EncodeError::UnknownCommandType(0x7E)));
    }

    #[test]
    fn test_provide_local_info_language() {
        let tr = response(CommandType::ProvideLocalInfo, 0x04).with_payload(
            ResponsePayload::ProvideLocalInfo(LocalInfo::Language(Language("en".to_string()))),
        );
        let bytes = encode_terminal_response(&tr).unwrap();
        assert_eq!(bytes, hex::decode("810301260482028281830100AD02656E").unwrap());
    }

    #[test]
    fn test_perform_card_apdu() {
        let tr = response(CommandType::PerformCardApdu, 0x00).with_payload(
            ResponsePayload::PerformCardApdu {
                r_apdu: Some(RApdu::success(vec![0x01])),
            },
        );
        let bytes = encode_terminal_response(&tr).unwrap();
        assert!(bytes.ends_with(&hex::decode("A303019000").unwrap()));
    }

    #[test]
    fn test_get_channel_status() {
        let tr = response(CommandType::GetChannelStatus, 0x00).with_payload(
            ResponsePayload::GetChannelStatus {
                channels: vec![
                    ChannelStatus {
                        channel_id: 1,
                        state: ChannelState::Activated,
                    },
                    ChannelStatus {
                        channel_id: 2,
                        state: ChannelState::LinkDropped,
                    },
                ],
            },
        );
        let bytes = encode_terminal_response(&tr).unwrap();
        assert!(bytes.ends_with(&hex::decode("B8028100B8020205").unwrap()));
    }

    #[test]
    fn test_reader_id_not_comprehension_required() {
        let tr = response(CommandType::GetReaderStatus, 0x01).with_payload(
            ResponsePayload::GetReaderStatus {
                status: None,
                reader_id: Some(vec![0x01]),
            },
        );
        let bytes = encode_terminal_response(&tr).unwrap();
        assert!(bytes.ends_with(&hex::decode("3A0101").unwrap()));
    }
}
