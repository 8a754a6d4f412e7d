//! Envelope decoder

use log::debug;

use super::{CallControlTarget, Envelope, EnvelopeKind, EnvelopePayload, Event};
use crate::command::walker::{opt, val, walk, Objects, Rule};
use crate::command::ParseError;
use crate::config::CodecConfig;
use crate::error::DecodeError;
use crate::objects::{DataObject, DeviceIdentities, EventList, EventType, ObjectError};
use crate::tlv::{hexify, read_ber, read_single, tags};

const SMS_PP_DOWNLOAD: &[Rule] = &[
    val(tags::DEVICE_IDENTITIES),
    opt(tags::ADDRESS),
    val(tags::GSM_SMS_TPDU),
];
const CBS_PP_DOWNLOAD: &[Rule] = &[val(tags::DEVICE_IDENTITIES), val(tags::CBS_PAGE)];
const MENU_SELECTION: &[Rule] = &[
    val(tags::DEVICE_IDENTITIES),
    val(tags::ITEM_ID),
    opt(tags::HELP_REQUEST),
];
const CALL_CONTROL: &[Rule] = &[
    val(tags::DEVICE_IDENTITIES),
    opt(tags::ADDRESS),
    opt(tags::SS_STRING),
    opt(tags::USSD_STRING),
    opt(tags::CCP),
    opt(tags::SUBADDRESS),
    opt(tags::LOCATION_INFO),
    opt(tags::CCP),
    opt(tags::BC_REPEAT_INDICATOR),
];
const MO_SHORT_MESSAGE_CONTROL: &[Rule] = &[
    val(tags::DEVICE_IDENTITIES),
    val(tags::ADDRESS),
    val(tags::ADDRESS),
    opt(tags::LOCATION_INFO),
];
const TIMER_EXPIRATION: &[Rule] = &[
    val(tags::DEVICE_IDENTITIES),
    val(tags::TIMER_ID),
    val(tags::TIMER_VALUE),
];
const USSD_DOWNLOAD: &[Rule] = &[val(tags::DEVICE_IDENTITIES), val(tags::USSD_STRING)];

/// Decode an envelope with the default configuration
pub fn decode_envelope(bytes: &[u8]) -> Result<Envelope, DecodeError> {
    decode_envelope_with(bytes, &CodecConfig::default())
}

pub fn decode_envelope_with(bytes: &[u8], config: &CodecConfig) -> Result<Envelope, DecodeError> {
    debug!("Decoding envelope: {}", hexify(bytes));
    let strict = config.strict_length_form;
    let (tag, body) = read_ber(bytes, strict)?;
    let ignore_unknown_cr = config.ignore_unknown_cr_objects;

    let (objects, payload) = match EnvelopeKind::from(tag) {
        EnvelopeKind::EventDownload => {
            let (event_type, rest) = event_list(body, strict)?;
            let rules = Event::rules(event_type).ok_or(ObjectError::InvalidValue {
                object: "event",
                value: event_type.into(),
            })?;
            let objects = walk(rest, rules, strict, ignore_unknown_cr)?;
            let event = Event::decode(event_type, &objects)?;
            (objects, EnvelopePayload::EventDownload(event))
        }
        EnvelopeKind::Unknown(tag) => return Err(DecodeError::UnexpectedWrapper(tag)),
        kind => {
            let objects = walk(body, rules(kind), strict, ignore_unknown_cr)?;
            let payload = decode_payload(kind, &objects)?;
            (objects, payload)
        }
    };

    let devices: DeviceIdentities = objects.require(tags::DEVICE_IDENTITIES)?;
    Ok(Envelope {
        src: devices.src,
        dst: devices.dst,
        payload,
    })
}

/// Read the leading event list; it must name exactly one event
fn event_list(body: &[u8], strict: bool) -> Result<(EventType, &[u8]), DecodeError> {
    if body.is_empty() {
        return Err(DecodeError::MissingObject("event list"));
    }
    let (tlv, consumed) = read_single(body, strict)?;
    if tlv.tag != tags::EVENT_LIST {
        return Err(DecodeError::MissingObject("event list"));
    }
    let events = EventList::decode(tlv.value)?;
    match events.0.as_slice() {
        [event_type] => Ok((*event_type, &body[consumed..])),
        other => Err(DecodeError::Object(ObjectError::InvalidLength {
            object: "event list",
            length: other.len(),
        })),
    }
}

fn rules(kind: EnvelopeKind) -> &'static [Rule] {
    match kind {
        EnvelopeKind::SmsPpDownload => SMS_PP_DOWNLOAD,
        EnvelopeKind::CbsPpDownload => CBS_PP_DOWNLOAD,
        EnvelopeKind::MenuSelection => MENU_SELECTION,
        EnvelopeKind::CallControl => CALL_CONTROL,
        EnvelopeKind::MoShortMessageControl => MO_SHORT_MESSAGE_CONTROL,
        EnvelopeKind::TimerExpiration => TIMER_EXPIRATION,
        EnvelopeKind::UssdDownload => USSD_DOWNLOAD,
        EnvelopeKind::EventDownload | EnvelopeKind::Unknown(_) => &[],
    }
}

fn call_control_target(o: &Objects<'_>) -> Result<CallControlTarget, ParseError> {
    let address = o.decode(tags::ADDRESS)?.map(CallControlTarget::Address);
    let ss = o.decode(tags::SS_STRING)?.map(CallControlTarget::SsString);
    let ussd = o.decode(tags::USSD_STRING)?.map(CallControlTarget::UssdString);
    let mut targets = [address, ss, ussd].into_iter().flatten();
    match (targets.next(), targets.next()) {
        (Some(target), None) => Ok(target),
        (None, _) => Err(ParseError::MissingValue),
        (Some(_), Some(_)) => Err(ParseError::DataNotUnderstood),
    }
}

fn decode_payload(kind: EnvelopeKind, o: &Objects<'_>) -> Result<EnvelopePayload, ParseError> {
    let bytes = |tag| o.get(tag).map(<[u8]>::to_vec);
    let payload = match kind {
        EnvelopeKind::SmsPpDownload => EnvelopePayload::SmsPpDownload {
            address: o.decode(tags::ADDRESS)?,
            tpdu: bytes(tags::GSM_SMS_TPDU).unwrap_or_default(),
        },
        EnvelopeKind::CbsPpDownload => EnvelopePayload::CbsPpDownload {
            page: bytes(tags::CBS_PAGE).unwrap_or_default(),
        },
        EnvelopeKind::MenuSelection => EnvelopePayload::MenuSelection {
            item_id: o.require(tags::ITEM_ID)?,
            help_request: o.has(tags::HELP_REQUEST),
        },
        EnvelopeKind::CallControl => EnvelopePayload::CallControl {
            target: call_control_target(o)?,
            ccp: o.nth(tags::CCP, 0).map(<[u8]>::to_vec),
            subaddress: bytes(tags::SUBADDRESS),
            location: o.decode(tags::LOCATION_INFO)?,
            ccp2: o.nth(tags::CCP, 1).map(<[u8]>::to_vec),
            bc_repeat_indicator: o.decode(tags::BC_REPEAT_INDICATOR)?,
        },
        EnvelopeKind::MoShortMessageControl => EnvelopePayload::MoShortMessageControl {
            sc_address: o.decode_nth(tags::ADDRESS, 0)?.ok_or(ParseError::MissingValue)?,
            destination: o.decode_nth(tags::ADDRESS, 1)?.ok_or(ParseError::MissingValue)?,
            location: o.decode(tags::LOCATION_INFO)?,
        },
        EnvelopeKind::TimerExpiration => EnvelopePayload::TimerExpiration {
            timer_id: o.require(tags::TIMER_ID)?,
            timer_value: o.require(tags::TIMER_VALUE)?,
        },
        EnvelopeKind::UssdDownload => EnvelopePayload::UssdDownload {
            ussd_string: o.require(tags::USSD_STRING)?,
        },
        EnvelopeKind::EventDownload | EnvelopeKind::Unknown(_) => {
            return Err(ParseError::TypeNotUnderstood)
        }
    };
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::encode_envelope;
    use crate::objects::{Address, ChannelState, ChannelStatus, DeviceIdentity, Language, TimerValue};
    use crate::tlv::TlvError;

    #[test]
    fn test_menu_selection() {
        let envelope = decode_envelope(&hex::decode("D309820201819001029500").unwrap()).unwrap();
        assert_eq!(envelope.src, DeviceIdentity::Keypad);
        assert_eq!(envelope.dst, DeviceIdentity::Uicc);
        assert_eq!(
            envelope.payload,
            EnvelopePayload::MenuSelection {
                item_id: 2,
                help_request: true,
            }
        );
    }

    #[test]
    fn test_sms_pp_download() {
        let bytes = hex::decode("D10E8202838106039121F38B03010203").unwrap();
        let envelope = decode_envelope(&bytes).unwrap();
        assert_eq!(
            envelope.payload,
            EnvelopePayload::SmsPpDownload {
                address: Some(Address::new(0x91, "123")),
                tpdu: vec![0x01, 0x02, 0x03],
            }
        );
    }

    #[test]
    fn test_sms_pp_download_empty_tpdu() {
        let bytes = hex::decode("D106820283818B00").unwrap();
        assert_eq!(
            decode_envelope(&bytes),
            Err(DecodeError::Objects(ParseError::MissingValue))
        );
    }

    #[test]
    fn test_timer_expiration() {
        let bytes = hex::decode("D70C82028281A40101A503003095").unwrap();
        let envelope = decode_envelope(&bytes).unwrap();
        assert_eq!(
            envelope.payload,
            EnvelopePayload::TimerExpiration {
                timer_id: 1,
                timer_value: TimerValue::new(0, 3, 59),
            }
        );
    }

    #[test]
    fn test_call_control_two_ccps() {
        let bytes = hex::decode("D4118202828186039121F38702010287020304").unwrap();
        let envelope = decode_envelope(&bytes).unwrap();
        match envelope.payload {
            EnvelopePayload::CallControl { ccp, ccp2, .. } => {
                assert_eq!(ccp, Some(vec![0x01, 0x02]));
                assert_eq!(ccp2, Some(vec![0x03, 0x04]));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_call_control_without_target() {
        let bytes = hex::decode("D40482028281").unwrap();
        assert_eq!(
            decode_envelope(&bytes),
            Err(DecodeError::Objects(ParseError::MissingValue))
        );
    }

    #[test]
    fn test_mo_short_message_control() {
        let bytes = hex::decode("D5178202828186039121F386038121F3930732F45100010002").unwrap();
        let envelope = decode_envelope(&bytes).unwrap();
        match envelope.payload {
            EnvelopePayload::MoShortMessageControl {
                sc_address,
                destination,
                location,
            } => {
                assert_eq!(sc_address, Address::new(0x91, "123"));
                assert_eq!(destination, Address::new(0x81, "123"));
                assert_eq!(location.map(|l| l.lac), Some(0x0001));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_event_mt_call() {
        let bytes = hex::decode("D60A990100820283819C0100").unwrap();
        let envelope = decode_envelope(&bytes).unwrap();
        assert_eq!(envelope.src, DeviceIdentity::Network);
        assert_eq!(
            envelope.payload,
            EnvelopePayload::EventDownload(Event::MtCall {
                transaction_id: 0,
                address: None,
                subaddress: None,
            })
        );
    }

    #[test]
    fn test_event_round_trips() {
        let events = [
            Event::UserActivity,
            Event::LanguageSelection(Language("de".to_string())),
            Event::ChannelStatus(ChannelStatus {
                channel_id: 1,
                state: ChannelState::LinkDropped,
            }),
            Event::CallDisconnected {
                transaction_ids: vec![0x80],
                cause: Some(Vec::new()),
            },
        ];
        for event in events {
            let envelope = Envelope::new(EnvelopePayload::EventDownload(event));
            let bytes = encode_envelope(&envelope).unwrap();
            assert_eq!(decode_envelope(&bytes).unwrap(), envelope);
        }
    }

    #[test]
    fn test_event_list_with_two_events() {
        let bytes = hex::decode("D6089902040582028281").unwrap();
        assert!(matches!(
            decode_envelope(&bytes),
            Err(DecodeError::Object(ObjectError::InvalidLength { length: 2, .. }))
        ));
    }

    #[test]
    fn test_event_list_not_first() {
        let bytes = hex::decode("D60782028281990104").unwrap();
        assert_eq!(decode_envelope(&bytes), Err(DecodeError::MissingObject("event list")));
    }

    #[test]
    fn test_unknown_event() {
        let bytes = hex::decode("D60799014282028281").unwrap();
        assert!(matches!(
            decode_envelope(&bytes),
            Err(DecodeError::Object(ObjectError::InvalidValue { value: 0x42, .. }))
        ));
    }

    #[test]
    fn test_unexpected_wrapper() {
        let bytes = hex::decode("D00482028281").unwrap();
        assert_eq!(decode_envelope(&bytes), Err(DecodeError::UnexpectedWrapper(0xD0)));
    }

    #[test]
    fn test_truncated_wrapper() {
        let bytes = hex::decode("D30982020181").unwrap();
        assert!(matches!(
            decode_envelope(&bytes),
            Err(DecodeError::Malformed(TlvError::UnexpectedEndValue { .. }))
        ));
    }
}
