//! Envelope encoder

use log::{debug, warn};

use super::{CallControlTarget, Envelope, EnvelopePayload};
use crate::error::EncodeError;
use crate::objects::{DeviceIdentities, EventList, ObjectWriter};
use crate::tlv::{hexify, tags, TlvBuilder};

/// Encode an envelope, wrapper included
pub fn encode_envelope(envelope: &Envelope) -> Result<Vec<u8>, EncodeError> {
    if let Err(e) = validate(&envelope.payload) {
        warn!("Rejecting {:?} envelope: {}", envelope.kind(), e);
        return Err(e);
    }

    let devices = DeviceIdentities::new(envelope.src, envelope.dst);
    let mut builder = TlvBuilder::new();
    // The event list goes ahead of the device identities
    if let EnvelopePayload::EventDownload(event) = &envelope.payload {
        builder.put(tags::EVENT_LIST, true, &EventList(vec![event.event_type()]))?;
    }
    builder.put(tags::DEVICE_IDENTITIES, true, &devices)?;
    encode_payload(&envelope.payload, &mut builder)?;

    let bytes = builder.wrap(envelope.kind().into())?;
    debug!("Envelope: {}", hexify(&bytes));
    Ok(bytes)
}

fn validate(payload: &EnvelopePayload) -> Result<(), EncodeError> {
    match payload {
        EnvelopePayload::SmsPpDownload { tpdu, .. } if tpdu.is_empty() => {
            Err(EncodeError::MissingObject("SMS TPDU"))
        }
        EnvelopePayload::CbsPpDownload { page } if page.is_empty() => {
            Err(EncodeError::MissingObject("CBS page"))
        }
        EnvelopePayload::MenuSelection { item_id: 0, .. } => {
            Err(EncodeError::InvalidCombination("item identifier 0 is reserved"))
        }
        EnvelopePayload::CallControl {
            ccp: None,
            ccp2: Some(_),
            ..
        } => Err(EncodeError::InvalidCombination(
            "second capability configuration without a first",
        )),
        _ => Ok(()),
    }
}

fn encode_payload(payload: &EnvelopePayload, builder: &mut TlvBuilder) -> Result<(), EncodeError> {
    match payload {
        EnvelopePayload::SmsPpDownload { address, tpdu } => {
            builder.put_opt(tags::ADDRESS, false, address.as_ref())?;
            builder.put(tags::GSM_SMS_TPDU, true, tpdu)?;
        }
        EnvelopePayload::CbsPpDownload { page } => {
            builder.put(tags::CBS_PAGE, true, page)?;
        }
        EnvelopePayload::MenuSelection {
            item_id,
            help_request,
        } => {
            builder.put(tags::ITEM_ID, true, item_id)?;
            if *help_request {
                builder.push(tags::HELP_REQUEST, true, &[])?;
            }
        }
        EnvelopePayload::CallControl {
            target,
            ccp,
            subaddress,
            location,
            ccp2,
            bc_repeat_indicator,
        } => {
            match target {
                CallControlTarget::Address(address) => builder.put(tags::ADDRESS, true, address)?,
                CallControlTarget::SsString(ss) => builder.put(tags::SS_STRING, true, ss)?,
                CallControlTarget::UssdString(ussd) => {
                    builder.put(tags::USSD_STRING, true, ussd)?
                }
            }
            builder.put_opt(tags::CCP, true, ccp.as_ref())?;
            builder.put_opt(tags::SUBADDRESS, true, subaddress.as_ref())?;
            builder.put_opt(tags::LOCATION_INFO, true, location.as_ref())?;
            builder.put_opt(tags::CCP, true, ccp2.as_ref())?;
            builder.put_opt(
                tags::BC_REPEAT_INDICATOR,
                true,
                bc_repeat_indicator.as_ref(),
            )?;
        }
        EnvelopePayload::MoShortMessageControl {
            sc_address,
            destination,
            location,
        } => {
            builder.put(tags::ADDRESS, true, sc_address)?;
            builder.put(tags::ADDRESS, true, destination)?;
            builder.put_opt(tags::LOCATION_INFO, true, location.as_ref())?;
        }
        EnvelopePayload::TimerExpiration {
            timer_id,
            timer_value,
        } => {
            builder.put(tags::TIMER_ID, true, timer_id)?;
            builder.put(tags::TIMER_VALUE, true, timer_value)?;
        }
        EnvelopePayload::UssdDownload { ussd_string } => {
            builder.put(tags::USSD_STRING, true, ussd_string)?;
        }
        EnvelopePayload::EventDownload(event) => event.encode(builder)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Event;
    use crate::objects::{
        Address, CellId, DeviceIdentity, LocationInfo, LocationStatus, TimerValue, UssdString,
    };

    #[test]
    fn test_menu_selection() {
        let envelope = Envelope::new(EnvelopePayload::MenuSelection {
            item_id: 2,
            help_request: false,
        });
        assert_eq!(
            encode_envelope(&envelope).unwrap(),
            hex::decode("D30782020181900102").unwrap()
        );

        let envelope = Envelope::new(EnvelopePayload::MenuSelection {
            item_id: 2,
            help_request: true,
        });
        assert_eq!(
            encode_envelope(&envelope).unwrap(),
            hex::decode("D309820201819001029500").unwrap()
        );
    }

    #[test]
    fn test_menu_selection_reserved_item() {
        let envelope = Envelope::new(EnvelopePayload::MenuSelection {
            item_id: 0,
            help_request: false,
        });
        assert!(matches!(
            encode_envelope(&envelope),
            Err(EncodeError::InvalidCombination(_))
        ));
    }

    #[test]
    fn test_sms_pp_download() {
        let envelope = Envelope::new(EnvelopePayload::SmsPpDownload {
            address: Some(Address::new(0x91, "123")),
            tpdu: vec![0x01, 0x02, 0x03],
        });
        assert_eq!(
            encode_envelope(&envelope).unwrap(),
            hex::decode("D10E8202838106039121F38B03010203").unwrap()
        );

        let empty = Envelope::new(EnvelopePayload::SmsPpDownload {
            address: None,
            tpdu: Vec::new(),
        });
        assert_eq!(encode_envelope(&empty), Err(EncodeError::MissingObject("SMS TPDU")));
    }

    #[test]
    fn test_cbs_pp_download() {
        let envelope = Envelope::new(EnvelopePayload::CbsPpDownload {
            page: vec![0xC0, 0x11],
        });
        assert_eq!(
            encode_envelope(&envelope).unwrap(),
            hex::decode("D208820283818C02C011").unwrap()
        );
    }

    #[test]
    fn test_event_mt_call() {
        let envelope = Envelope::new(EnvelopePayload::EventDownload(Event::MtCall {
            transaction_id: 0,
            address: None,
            subaddress: None,
        }));
        assert_eq!(envelope.src, DeviceIdentity::Network);
        assert_eq!(
            encode_envelope(&envelope).unwrap(),
            hex::decode("D60A990100820283819C0100").unwrap()
        );
    }

    #[test]
    fn test_event_location_status() {
        let envelope = Envelope::new(EnvelopePayload::EventDownload(Event::LocationStatus {
            status: LocationStatus::NoService,
            location: None,
        }));
        assert_eq!(
            encode_envelope(&envelope).unwrap(),
            hex::decode("D60A990103820282819B0102").unwrap()
        );
    }

    #[test]
    fn test_event_idle_screen() {
        let envelope = Envelope::new(EnvelopePayload::EventDownload(Event::IdleScreenAvailable));
        assert_eq!(
            encode_envelope(&envelope).unwrap(),
            hex::decode("D60799010582020281").unwrap()
        );
    }

    #[test]
    fn test_timer_expiration() {
        let envelope = Envelope::new(EnvelopePayload::TimerExpiration {
            timer_id: 1,
            timer_value: TimerValue::new(0, 3, 59),
        });
        assert_eq!(
            encode_envelope(&envelope).unwrap(),
            hex::decode("D70C82028281A40101A503003095").unwrap()
        );
    }

    #[test]
    fn test_call_control() {
        let envelope = Envelope::new(EnvelopePayload::CallControl {
            target: CallControlTarget::Address(Address::new(0x91, "123")),
            ccp: None,
            subaddress: None,
            location: None,
            ccp2: None,
            bc_repeat_indicator: None,
        });
        assert_eq!(
            encode_envelope(&envelope).unwrap(),
            hex::decode("D4098202828186039121F3").unwrap()
        );
    }

    #[test]
    fn test_call_control_second_ccp_alone() {
        let envelope = Envelope::new(EnvelopePayload::CallControl {
            target: CallControlTarget::Address(Address::new(0x91, "123")),
            ccp: None,
            subaddress: None,
            location: None,
            ccp2: Some(vec![0x03, 0x04]),
            bc_repeat_indicator: None,
        });
        assert!(matches!(
            encode_envelope(&envelope),
            Err(EncodeError::InvalidCombination(_))
        ));
    }

    #[test]
    fn test_mo_short_message_control() {
        let envelope = Envelope::new(EnvelopePayload::MoShortMessageControl {
            sc_address: Address::new(0x91, "123"),
            destination: Address::new(0x81, "123"),
            location: Some(LocationInfo {
                mcc: "234".to_string(),
                mnc: "15".to_string(),
                lac: 0x0001,
                cell_id: Some(CellId::Gsm(0x0002)),
            }),
        });
        assert_eq!(
            encode_envelope(&envelope).unwrap(),
            hex::decode("D5178202828186039121F386038121F3930732F45100010002").unwrap()
        );
    }

    #[test]
    fn test_ussd_download() {
        let envelope = Envelope::new(EnvelopePayload::UssdDownload {
            ussd_string: UssdString {
                dcs: 0x0F,
                data: vec![0xAA],
            },
        });
        assert_eq!(
            encode_envelope(&envelope).unwrap(),
            hex::decode("D908820283818A020FAA").unwrap()
        );
    }
}
