//! Terminal response decoder
//!
//! Mirrors the encoder: the header objects are read strictly in order,
//! the command-specific objects are matched like a command body.

use log::debug;

use super::{AnswerText, LocalInfo, LocalInfoKind, ResponsePayload, TerminalResponse};
use crate::charset::{self, Charset};
use crate::command::walker::{many, opt, walk, Objects, Rule};
use crate::command::{qualifier, CommandDetails, CommandType};
use crate::config::CodecConfig;
use crate::error::DecodeError;
use crate::objects::{ChannelStatus, DataObject, DeviceIdentities, GeneralResult, ObjectError};
use crate::tlv::{hexify, tags, TlvReader};

const NO_OBJECTS: &[Rule] = &[];
const GET_INKEY: &[Rule] = &[opt(tags::TEXT_STRING), opt(tags::DURATION)];
const GET_INPUT: &[Rule] = &[opt(tags::TEXT_STRING)];
const POLL_INTERVAL: &[Rule] = &[opt(tags::DURATION)];
const SELECT_ITEM: &[Rule] = &[opt(tags::ITEM_ID)];
const SETUP_CALL: &[Rule] = &[opt(tags::CALL_CONTROL_REQUESTED_ACTION), opt(tags::RESULT)];
const SEND_USSD: &[Rule] = &[opt(tags::TEXT_STRING)];
const TIMER_MANAGEMENT: &[Rule] = &[opt(tags::TIMER_ID), opt(tags::TIMER_VALUE)];
const PERFORM_CARD_APDU: &[Rule] = &[opt(tags::R_APDU)];
const POWER_ON_CARD: &[Rule] = &[opt(tags::CARD_ATR)];
const GET_READER_STATUS: &[Rule] = &[opt(tags::CARD_READER_STATUS), opt(tags::CARD_READER_ID)];
const RUN_AT_COMMAND: &[Rule] = &[opt(tags::AT_RESPONSE)];
const OPEN_CHANNEL: &[Rule] = &[
    opt(tags::CHANNEL_STATUS),
    opt(tags::BEARER_DESCRIPTION),
    opt(tags::BUFFER_SIZE),
];
const RECEIVE_DATA: &[Rule] = &[opt(tags::CHANNEL_DATA), opt(tags::CHANNEL_DATA_LENGTH)];
const SEND_DATA: &[Rule] = &[opt(tags::CHANNEL_DATA_LENGTH)];
const GET_CHANNEL_STATUS: &[Rule] = &[many(opt(tags::CHANNEL_STATUS))];
const GET_SERVICE_INFO: &[Rule] = &[opt(tags::SERVICE_RECORD)];
const GET_FRAMES_STATUS: &[Rule] = &[opt(tags::FRAMES_INFO)];

fn rules(details: &CommandDetails) -> &'static [Rule] {
    match details.command_type {
        CommandType::GetInkey => GET_INKEY,
        CommandType::GetInput => GET_INPUT,
        CommandType::PollInterval => POLL_INTERVAL,
        CommandType::SelectItem => SELECT_ITEM,
        CommandType::SetupCall => SETUP_CALL,
        CommandType::SendUssd => SEND_USSD,
        CommandType::ProvideLocalInfo => LocalInfo::rules(details.qualifier.into()),
        CommandType::TimerManagement => TIMER_MANAGEMENT,
        CommandType::PerformCardApdu => PERFORM_CARD_APDU,
        CommandType::PowerOnCard => POWER_ON_CARD,
        CommandType::GetReaderStatus => GET_READER_STATUS,
        CommandType::RunAtCommand => RUN_AT_COMMAND,
        CommandType::OpenChannel => OPEN_CHANNEL,
        CommandType::ReceiveData => RECEIVE_DATA,
        CommandType::SendData => SEND_DATA,
        CommandType::GetChannelStatus => GET_CHANNEL_STATUS,
        CommandType::GetServiceInfo => GET_SERVICE_INFO,
        CommandType::GetFramesStatus => GET_FRAMES_STATUS,
        _ => NO_OBJECTS,
    }
}

/// Decode a terminal response with the default configuration
pub fn decode_terminal_response(bytes: &[u8]) -> Result<TerminalResponse, DecodeError> {
    decode_terminal_response_with(bytes, &CodecConfig::default())
}

pub fn decode_terminal_response_with(
    bytes: &[u8],
    config: &CodecConfig,
) -> Result<TerminalResponse, DecodeError> {
    debug!("Decoding terminal response: {}", hexify(bytes));
    let mut reader = TlvReader::new(bytes).strict(config.strict_length_form);

    let details: CommandDetails = header(&mut reader, tags::COMMAND_DETAILS, "command details")?;
    let ids: DeviceIdentities = header(&mut reader, tags::DEVICE_IDENTITIES, "device identities")?;
    let result: GeneralResult = header(&mut reader, tags::RESULT, "result")?;
    if !details.command_type.is_known() {
        return Err(DecodeError::UnknownCommandType(details.command_type.into()));
    }

    let objects = walk(
        reader.remaining(),
        rules(&details),
        config.strict_length_form,
        config.ignore_unknown_cr_objects,
    )?;
    let payload = if objects.is_empty() {
        ResponsePayload::None
    } else {
        decode_payload(&details, &objects)?
    };

    Ok(TerminalResponse {
        number: details.number,
        command_type: details.command_type,
        qualifier: details.qualifier,
        src: ids.src,
        dst: ids.dst,
        result,
        payload,
    })
}

fn header<T: DataObject>(
    reader: &mut TlvReader<'_>,
    tag: u16,
    name: &'static str,
) -> Result<T, DecodeError> {
    match reader.next() {
        Some(tlv) => {
            let tlv = tlv?;
            if tlv.tag != tag {
                return Err(DecodeError::MissingObject(name));
            }
            Ok(T::decode(tlv.value)?)
        }
        None => Err(DecodeError::MissingObject(name)),
    }
}

/// Decode a text string answer; `yes_no` selects the GET INKEY yes/no form
fn answer(value: &[u8], yes_no: bool) -> Result<AnswerText, ObjectError> {
    let Some((&dcs, data)) = value.split_first() else {
        return Ok(AnswerText::Unpacked(String::new()));
    };
    if yes_no {
        return match data {
            [0x01] => Ok(AnswerText::YesNo(true)),
            [0x00] => Ok(AnswerText::YesNo(false)),
            _ => Err(ObjectError::InvalidLength {
                object: "yes/no answer",
                length: data.len(),
            }),
        };
    }

    let coding = charset::sms_dcs_charset(dcs)?;
    let text = charset::decode_text(coding, data)?;
    Ok(match coding {
        Charset::Gsm7 => AnswerText::Packed(text),
        Charset::Gsm8 => AnswerText::Unpacked(text),
        Charset::Ucs2 => AnswerText::Ucs2(text),
    })
}

fn ascii(value: &[u8]) -> Result<String, ObjectError> {
    if !value.is_ascii() {
        return Err(ObjectError::InvalidValue {
            object: "AT response",
            value: value.iter().copied().find(|b| !b.is_ascii()).unwrap_or(0),
        });
    }
    Ok(String::from_utf8_lossy(value).into_owned())
}

fn decode_payload(
    details: &CommandDetails,
    o: &Objects<'_>,
) -> Result<ResponsePayload, DecodeError> {
    let bytes = |tag| o.get(tag).map(<[u8]>::to_vec);
    let payload = match details.command_type {
        CommandType::GetInkey => {
            let yes_no = details.qualifier & qualifier::GET_INKEY_YES_NO != 0;
            ResponsePayload::GetInkey {
                text: o.get(tags::TEXT_STRING).map(|v| answer(v, yes_no)).transpose()?,
                duration: o.decode(tags::DURATION)?,
            }
        }
        CommandType::GetInput => ResponsePayload::GetInput {
            text: o.get(tags::TEXT_STRING).map(|v| answer(v, false)).transpose()?,
        },
        CommandType::PollInterval => ResponsePayload::PollInterval {
            duration: o.decode(tags::DURATION)?,
        },
        CommandType::SelectItem => ResponsePayload::SelectItem {
            item_id: o.decode(tags::ITEM_ID)?,
        },
        CommandType::SetupCall => ResponsePayload::SetupCall {
            requested_action: bytes(tags::CALL_CONTROL_REQUESTED_ACTION),
            second_result: o.decode(tags::RESULT)?,
        },
        CommandType::SendUssd => ResponsePayload::SendUssd {
            text: o.decode(tags::TEXT_STRING)?,
        },
        CommandType::ProvideLocalInfo => {
            let kind = LocalInfoKind::from(details.qualifier);
            match LocalInfo::decode(kind, o)? {
                Some(info) => ResponsePayload::ProvideLocalInfo(info),
                None => ResponsePayload::None,
            }
        }
        CommandType::TimerManagement => ResponsePayload::TimerManagement {
            timer_id: o.decode(tags::TIMER_ID)?,
            timer_value: o.decode(tags::TIMER_VALUE)?,
        },
        CommandType::PerformCardApdu => ResponsePayload::PerformCardApdu {
            r_apdu: o.decode(tags::R_APDU)?,
        },
        CommandType::PowerOnCard => ResponsePayload::PowerOnCard {
            atr: bytes(tags::CARD_ATR),
        },
        CommandType::GetReaderStatus => ResponsePayload::GetReaderStatus {
            status: o.decode(tags::CARD_READER_STATUS)?,
            reader_id: bytes(tags::CARD_READER_ID),
        },
        CommandType::RunAtCommand => ResponsePayload::RunAtCommand {
            at_response: o.get(tags::AT_RESPONSE).map(ascii).transpose()?,
        },
        CommandType::OpenChannel => ResponsePayload::OpenChannel {
            channel_status: o.decode(tags::CHANNEL_STATUS)?,
            bearer: o.decode(tags::BEARER_DESCRIPTION)?,
            buffer_size: o.decode(tags::BUFFER_SIZE)?,
        },
        CommandType::ReceiveData => ResponsePayload::ReceiveData {
            data: bytes(tags::CHANNEL_DATA),
            remaining: o.decode(tags::CHANNEL_DATA_LENGTH)?,
        },
        CommandType::SendData => ResponsePayload::SendData {
            available: o.decode(tags::CHANNEL_DATA_LENGTH)?,
        },
        CommandType::GetChannelStatus => ResponsePayload::GetChannelStatus {
            channels: o
                .all(tags::CHANNEL_STATUS)
                .into_iter()
                .map(ChannelStatus::decode)
                .collect::<Result<_, _>>()?,
        },
        CommandType::GetServiceInfo => ResponsePayload::GetServiceInfo {
            service_record: bytes(tags::SERVICE_RECORD),
        },
        CommandType::GetFramesStatus => ResponsePayload::GetFramesStatus {
            frames_info: bytes(tags::FRAMES_INFO),
        },
        _ => ResponsePayload::None,
    };
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ParseError;
    use crate::objects::{ChannelState, DeviceIdentity, Duration, ResultType, TimerValue};
    use crate::response::encode_terminal_response;
    use crate::tlv::TlvError;

    #[test]
    fn test_header_only() {
        let bytes = hex::decode("810301218082028281830100").unwrap();
        let tr = decode_terminal_response(&bytes).unwrap();
        assert_eq!(tr.command_type, CommandType::DisplayText);
        assert_eq!(tr.qualifier, 0x80);
        assert_eq!(tr.src, DeviceIdentity::Terminal);
        assert_eq!(tr.dst, DeviceIdentity::Uicc);
        assert_eq!(tr.result, GeneralResult::success());
        assert_eq!(tr.payload, ResponsePayload::None);
    }

    #[test]
    fn test_timer_management() {
        let bytes = hex::decode("810301270282028281830100a40101a503003095").unwrap();
        let tr = decode_terminal_response(&bytes).unwrap();
        assert_eq!(
            tr.payload,
            ResponsePayload::TimerManagement {
                timer_id: Some(1),
                timer_value: Some(TimerValue::new(0, 3, 59)),
            }
        );
    }

    #[test]
    fn test_get_inkey_yes_no() {
        let bytes = hex::decode("8103012204820282818301008D020401").unwrap();
        let tr = decode_terminal_response(&bytes).unwrap();
        assert_eq!(
            tr.payload,
            ResponsePayload::GetInkey {
                text: Some(AnswerText::YesNo(true)),
                duration: None,
            }
        );

        // Same bytes without the yes/no qualifier read as a character
        let bytes = hex::decode("8103012200820282818301008D020401").unwrap();
        let tr = decode_terminal_response(&bytes).unwrap();
        assert!(matches!(
            tr.payload,
            ResponsePayload::GetInkey {
                text: Some(AnswerText::Unpacked(_)),
                ..
            }
        ));
    }

    #[test]
    fn test_get_input_packed() {
        let bytes = hex::decode("8103012300820282818301008D040061F118").unwrap();
        let tr = decode_terminal_response(&bytes).unwrap();
        assert_eq!(
            tr.payload,
            ResponsePayload::GetInput {
                text: Some(AnswerText::Packed("abc".to_string())),
            }
        );
    }

    #[test]
    fn test_get_inkey_with_duration() {
        let bytes = hex::decode("8103012200820282818301008D02042B04020105").unwrap();
        let tr = decode_terminal_response(&bytes).unwrap();
        assert_eq!(
            tr.payload,
            ResponsePayload::GetInkey {
                text: Some(AnswerText::Unpacked("+".to_string())),
                duration: Some(Duration::seconds(5)),
            }
        );
    }

    #[test]
    fn test_result_with_additional_info() {
        let bytes = hex::decode("81030110008202828183022002").unwrap();
        let tr = decode_terminal_response(&bytes).unwrap();
        assert_eq!(
            tr.result,
            GeneralResult::with_additional(ResultType::TerminalBusy, vec![0x02])
        );
    }

    #[test]
    fn test_channel_status_list() {
        let bytes = hex::decode("810301440082028281830100B8028100B8020205").unwrap();
        let tr = decode_terminal_response(&bytes).unwrap();
        assert_eq!(
            tr.payload,
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
            }
        );
    }

    #[test]
    fn test_local_info_round_trip() {
        let original = TerminalResponse::new(
            3,
            CommandType::ProvideLocalInfo,
            0x07,
            GeneralResult::success(),
        )
        .with_payload(ResponsePayload::ProvideLocalInfo(LocalInfo::Esn(0x00C0FFEE)));
        let bytes = encode_terminal_response(&original).unwrap();
        assert_eq!(decode_terminal_response(&bytes).unwrap(), original);
    }

    #[test]
    fn test_missing_header() {
        let bytes = hex::decode("810301218082028281").unwrap();
        assert_eq!(
            decode_terminal_response(&bytes),
            Err(DecodeError::MissingObject("result"))
        );

        let bytes = hex::decode("820282818301008103012180").unwrap();
        assert_eq!(
            decode_terminal_response(&bytes),
            Err(DecodeError::MissingObject("command details"))
        );
    }

    #[test]
    fn test_unknown_command_type() {
        let bytes = hex::decode("8103017E0082028281830100").unwrap();
        assert_eq!(
            decode_terminal_response(&bytes),
            Err(DecodeError::UnknownCommandType(0x7E))
        );
    }

    #[test]
    fn test_unexpected_cr_object() {
        let bytes = hex::decode("810301218082028281830100900101").unwrap();
        assert_eq!(
            decode_terminal_response(&bytes),
            Err(DecodeError::Objects(ParseError::DataNotUnderstood))
        );

        let config = CodecConfig {
            ignore_unknown_cr_objects: true,
            ..CodecConfig::default()
        };
        let tr = decode_terminal_response_with(&bytes, &config).unwrap();
        assert_eq!(tr.payload, ResponsePayload::None);
    }

    #[test]
    fn test_truncated() {
        let bytes = hex::decode("8103012180820282818301").unwrap();
        assert!(matches!(
            decode_terminal_response(&bytes),
            Err(DecodeError::Malformed(TlvError::UnexpectedEndValue { .. }))
        ));
    }
}
