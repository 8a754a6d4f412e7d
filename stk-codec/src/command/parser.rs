//! Proactive command decoding
//!
//! Strips the 0xD0 wrapper, reads the command header and hands the rest of
//! the body to the command's grammar.

use log::{debug, warn};

use super::walker::{many, opt, req, val, walk, Objects, Rule};
use super::*;
use crate::config::CodecConfig;
use crate::objects::{
    Address, BearerDescription, DataObject, DeviceIdentities, DtmfString, Duration, EventList,
    FileList, Item, ResponseLength, TimerValue, UssdString,
};
use crate::tlv::{ber, hexify, read_ber, read_single, tags, TlvError};

type Decoder = fn(&Objects<'_>) -> Result<CommandPayload, ParseError>;

/// Parse a proactive command
///
/// Only PDUs without a usable command header are rejected outright. Every
/// other problem is reported through the returned command's `status`.
pub fn parse_proactive_command_with(
    pdu: &[u8],
    config: &CodecConfig,
) -> Result<ProactiveCommand, CommandError> {
    debug!("Proactive command: {}", hexify(pdu));

    let strict = config.strict_length_form;
    let (tag, body) = read_ber(pdu, strict)?;
    if tag != ber::PROACTIVE_COMMAND {
        return Err(CommandError::NotProactiveCommand(tag));
    }

    let (details, consumed) = match read_single(body, strict) {
        Ok((tlv, consumed)) if tlv.tag == tags::COMMAND_DETAILS => (tlv, consumed),
        Ok(_) | Err(TlvError::UnexpectedEndTag) => {
            return Err(CommandError::MissingCommandDetails)
        }
        Err(e) => return Err(e.into()),
    };
    let details = CommandDetails::decode(details.value)
        .map_err(|_| CommandError::InvalidCommandDetails(details.len()))?;

    let mut command = ProactiveCommand {
        number: details.number,
        command_type: details.command_type,
        qualifier: details.qualifier,
        src: DeviceIdentity::Unknown(0),
        dst: DeviceIdentity::Unknown(0),
        status: Ok(()),
        payload: CommandPayload::None,
    };

    command.status = parse_body(&mut command, &body[consumed..], config);
    match command.status {
        Ok(()) => debug!(
            "Parsed {:?} (number {}, qualifier 0x{:02X})",
            command.command_type, command.number, command.qualifier
        ),
        Err(e) => {
            debug!("{:?} not accepted: {}", command.command_type, e);
            command.payload = CommandPayload::None;
        }
    }

    Ok(command)
}

fn parse_body(command: &mut ProactiveCommand, rest: &[u8], config: &CodecConfig) -> ParseResult {
    let (ids, consumed) = match read_single(rest, config.strict_length_form) {
        Ok((tlv, consumed)) if tlv.tag == tags::DEVICE_IDENTITIES => (tlv, consumed),
        Ok(_) | Err(TlvError::UnexpectedEndTag) => return Err(ParseError::MissingValue),
        Err(e) => return Err(e.into()),
    };
    let ids = DeviceIdentities::decode(ids.value)?;
    command.src = ids.src;
    command.dst = ids.dst;

    let (rules, decode) = match grammar(command.command_type) {
        Some(entry) => entry,
        None => {
            warn!("Unknown command type 0x{:02X}", u8::from(command.command_type));
            return Err(ParseError::TypeNotUnderstood);
        }
    };
    let objects = walk(
        &rest[consumed..],
        rules,
        config.strict_length_form,
        config.ignore_unknown_cr_objects,
    )?;
    let payload = decode(&objects)?;
    check_qualifier(command.qualifier, &payload)?;
    command.payload = payload;
    Ok(())
}

/// Qualifier-dependent presence rules
fn check_qualifier(qualifier: u8, payload: &CommandPayload) -> ParseResult {
    if let CommandPayload::Refresh(refresh) = payload {
        // File change notification modes name the changed files
        if matches!(qualifier, 0x01 | 0x02) && refresh.file_list.is_none() {
            return Err(ParseError::MissingValue);
        }
    }
    Ok(())
}

const NO_OBJECTS: &[Rule] = &[];

const REFRESH: &[Rule] = &[
    opt(tags::FILE_LIST),
    opt(tags::AID),
    opt(tags::ALPHA_ID),
    opt(tags::ICON_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const POLL_INTERVAL: &[Rule] = &[val(tags::DURATION)];

const SETUP_EVENT_LIST: &[Rule] = &[req(tags::EVENT_LIST)];

const SETUP_CALL: &[Rule] = &[
    opt(tags::ALPHA_ID),
    val(tags::ADDRESS),
    opt(tags::CCP),
    opt(tags::SUBADDRESS),
    opt(tags::DURATION),
    opt(tags::ICON_ID),
    opt(tags::ALPHA_ID),
    opt(tags::ICON_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const SEND_SS: &[Rule] = &[
    opt(tags::ALPHA_ID),
    val(tags::SS_STRING),
    opt(tags::ICON_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const SEND_USSD: &[Rule] = &[
    opt(tags::ALPHA_ID),
    val(tags::USSD_STRING),
    opt(tags::ICON_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

// One of the two TPDU forms is required; checked after the walk
const SEND_SMS: &[Rule] = &[
    opt(tags::ALPHA_ID),
    opt(tags::ADDRESS),
    opt(tags::GSM_SMS_TPDU),
    opt(tags::CDMA_SMS_TPDU),
    opt(tags::ICON_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const SEND_DTMF: &[Rule] = &[
    opt(tags::ALPHA_ID),
    val(tags::DTMF_STRING),
    opt(tags::ICON_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const LAUNCH_BROWSER: &[Rule] = &[
    opt(tags::BROWSER_ID),
    req(tags::URL),
    opt(tags::BEARER),
    many(opt(tags::PROVISIONING_FILE_REF)),
    opt(tags::TEXT_STRING),
    opt(tags::ALPHA_ID),
    opt(tags::ICON_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const PLAY_TONE: &[Rule] = &[
    opt(tags::ALPHA_ID),
    opt(tags::TONE),
    opt(tags::DURATION),
    opt(tags::ICON_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const DISPLAY_TEXT: &[Rule] = &[
    req(tags::TEXT_STRING),
    opt(tags::ICON_ID),
    opt(tags::IMMEDIATE_RESPONSE),
    opt(tags::DURATION),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const GET_INKEY: &[Rule] = &[
    req(tags::TEXT_STRING),
    opt(tags::ICON_ID),
    opt(tags::DURATION),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const GET_INPUT: &[Rule] = &[
    req(tags::TEXT_STRING),
    val(tags::RESPONSE_LENGTH),
    opt(tags::DEFAULT_TEXT),
    opt(tags::ICON_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const SELECT_ITEM: &[Rule] = &[
    opt(tags::ALPHA_ID),
    many(req(tags::ITEM)),
    opt(tags::ITEMS_NEXT_ACTION_INDICATOR),
    opt(tags::ITEM_ID),
    opt(tags::ICON_ID),
    opt(tags::ITEM_ICON_ID_LIST),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::ITEM_TEXT_ATTRIBUTE_LIST),
    opt(tags::FRAME_ID),
];

const SETUP_MENU: &[Rule] = &[
    req(tags::ALPHA_ID),
    many(req(tags::ITEM)),
    opt(tags::ITEMS_NEXT_ACTION_INDICATOR),
    opt(tags::ICON_ID),
    opt(tags::ITEM_ICON_ID_LIST),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::ITEM_TEXT_ATTRIBUTE_LIST),
];

const TIMER_MANAGEMENT: &[Rule] = &[val(tags::TIMER_ID), opt(tags::TIMER_VALUE)];

const SETUP_IDLE_MODE_TEXT: &[Rule] = &[
    req(tags::TEXT_STRING),
    opt(tags::ICON_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const PERFORM_CARD_APDU: &[Rule] = &[val(tags::C_APDU)];

const RUN_AT_COMMAND: &[Rule] = &[
    opt(tags::ALPHA_ID),
    val(tags::AT_COMMAND),
    opt(tags::ICON_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const LANGUAGE_NOTIFICATION: &[Rule] = &[opt(tags::LANGUAGE)];

const OPEN_CHANNEL: &[Rule] = &[
    opt(tags::ALPHA_ID),
    opt(tags::ICON_ID),
    val(tags::BEARER_DESCRIPTION),
    val(tags::BUFFER_SIZE),
    opt(tags::NETWORK_ACCESS_NAME),
    opt(tags::OTHER_ADDRESS),
    opt(tags::TEXT_STRING),
    opt(tags::TEXT_STRING),
    opt(tags::UICC_TE_INTERFACE),
    opt(tags::OTHER_ADDRESS),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const CLOSE_CHANNEL: &[Rule] = &[
    opt(tags::ALPHA_ID),
    opt(tags::ICON_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const RECEIVE_DATA: &[Rule] = &[
    opt(tags::ALPHA_ID),
    opt(tags::ICON_ID),
    val(tags::CHANNEL_DATA_LENGTH),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const SEND_DATA: &[Rule] = &[
    opt(tags::ALPHA_ID),
    opt(tags::ICON_ID),
    req(tags::CHANNEL_DATA),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const SERVICE_SEARCH: &[Rule] = &[
    opt(tags::ALPHA_ID),
    opt(tags::ICON_ID),
    val(tags::SERVICE_SEARCH),
    opt(tags::DEVICE_FILTER),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const GET_SERVICE_INFO: &[Rule] = &[
    opt(tags::ALPHA_ID),
    opt(tags::ICON_ID),
    val(tags::ATTRIBUTE_INFO),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const DECLARE_SERVICE: &[Rule] = &[val(tags::SERVICE_RECORD), opt(tags::UICC_TE_INTERFACE)];

const SET_FRAMES: &[Rule] = &[
    opt(tags::FRAME_ID),
    opt(tags::FRAME_LAYOUT),
    opt(tags::FRAME_ID),
];

const RETRIEVE_MMS: &[Rule] = &[
    opt(tags::ALPHA_ID),
    opt(tags::ICON_ID),
    req(tags::MMS_REFERENCE),
    val(tags::FILE_LIST),
    req(tags::MMS_CONTENT_ID),
    opt(tags::MMS_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const SUBMIT_MMS: &[Rule] = &[
    opt(tags::ALPHA_ID),
    opt(tags::ICON_ID),
    val(tags::FILE_LIST),
    opt(tags::MMS_ID),
    opt(tags::TEXT_ATTRIBUTE),
    opt(tags::FRAME_ID),
];

const DISPLAY_MMS: &[Rule] = &[
    val(tags::FILE_LIST),
    req(tags::MMS_ID),
    opt(tags::IMMEDIATE_RESPONSE),
    opt(tags::FRAME_ID),
];

const ACTIVATE: &[Rule] = &[val(tags::ACTIVATE_DESCRIPTOR)];

/// Object grammar and decoder for a command type
fn grammar(command_type: CommandType) -> Option<(&'static [Rule], Decoder)> {
    let entry: (&'static [Rule], Decoder) = match command_type {
        CommandType::Refresh => (REFRESH, refresh),
        CommandType::PollInterval => (POLL_INTERVAL, poll_interval),
        CommandType::SetupEventList => (SETUP_EVENT_LIST, setup_event_list),
        CommandType::SetupCall => (SETUP_CALL, setup_call),
        CommandType::SendSs => (SEND_SS, send_ss),
        CommandType::SendUssd => (SEND_USSD, send_ussd),
        CommandType::SendSms => (SEND_SMS, send_sms),
        CommandType::SendDtmf => (SEND_DTMF, send_dtmf),
        CommandType::LaunchBrowser => (LAUNCH_BROWSER, launch_browser),
        CommandType::PlayTone => (PLAY_TONE, play_tone),
        CommandType::DisplayText => (DISPLAY_TEXT, display_text),
        CommandType::GetInkey => (GET_INKEY, get_inkey),
        CommandType::GetInput => (GET_INPUT, get_input),
        CommandType::SelectItem => (SELECT_ITEM, select_item),
        CommandType::SetupMenu => (SETUP_MENU, setup_menu),
        CommandType::TimerManagement => (TIMER_MANAGEMENT, timer_management),
        CommandType::SetupIdleModeText => (SETUP_IDLE_MODE_TEXT, setup_idle_mode_text),
        CommandType::PerformCardApdu => (PERFORM_CARD_APDU, perform_card_apdu),
        CommandType::RunAtCommand => (RUN_AT_COMMAND, run_at_command),
        CommandType::LanguageNotification => (LANGUAGE_NOTIFICATION, language_notification),
        CommandType::OpenChannel => (OPEN_CHANNEL, open_channel),
        CommandType::CloseChannel => (CLOSE_CHANNEL, close_channel),
        CommandType::ReceiveData => (RECEIVE_DATA, receive_data),
        CommandType::SendData => (SEND_DATA, send_data),
        CommandType::ServiceSearch => (SERVICE_SEARCH, service_search),
        CommandType::GetServiceInfo => (GET_SERVICE_INFO, get_service_info),
        CommandType::DeclareService => (DECLARE_SERVICE, declare_service),
        CommandType::SetFrames => (SET_FRAMES, set_frames),
        CommandType::RetrieveMms => (RETRIEVE_MMS, retrieve_mms),
        CommandType::SubmitMms => (SUBMIT_MMS, submit_mms),
        CommandType::DisplayMms => (DISPLAY_MMS, display_mms),
        CommandType::Activate => (ACTIVATE, activate),
        CommandType::MoreTime
        | CommandType::PollingOff
        | CommandType::ProvideLocalInfo
        | CommandType::PowerOnCard
        | CommandType::PowerOffCard
        | CommandType::GetReaderStatus
        | CommandType::GetChannelStatus
        | CommandType::GetFramesStatus => (NO_OBJECTS, no_payload),
        CommandType::Unknown(_) => return None,
    };
    Some(entry)
}

fn presentation(o: &Objects) -> Result<Presentation, ParseError> {
    Ok(Presentation {
        alpha_id: o.alpha(tags::ALPHA_ID)?,
        icon_id: o.decode(tags::ICON_ID)?,
        text_attribute: o.decode(tags::TEXT_ATTRIBUTE)?,
        frame_id: o.decode(tags::FRAME_ID)?,
    })
}

/// Item list rules: a lone empty item means "no items", any other empty
/// item is an error
fn items(o: &Objects) -> Result<Vec<Item>, ParseError> {
    let values = o.all(tags::ITEM);
    match values.as_slice() {
        [only] if only.is_empty() => Ok(Vec::new()),
        _ => values
            .iter()
            .map(|value| Item::decode(value).map_err(ParseError::from))
            .collect(),
    }
}

/// Raw bytes of an object carrying 8-bit ASCII text
fn ascii(o: &Objects, tag: u16) -> Result<Option<String>, ParseError> {
    match o.get(tag) {
        Some(value) if value.is_ascii() => Ok(Some(String::from_utf8_lossy(value).into_owned())),
        Some(_) => Err(ParseError::DataNotUnderstood),
        None => Ok(None),
    }
}

fn bytes(o: &Objects, tag: u16) -> Option<Vec<u8>> {
    o.get(tag).map(<[u8]>::to_vec)
}

fn no_payload(_: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::None)
}

fn refresh(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::Refresh(Refresh {
        file_list: o.decode(tags::FILE_LIST)?,
        aid: o.decode(tags::AID)?,
        presentation: presentation(o)?,
    }))
}

fn poll_interval(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::PollInterval(PollInterval {
        duration: o.require::<Duration>(tags::DURATION)?,
    }))
}

fn setup_event_list(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::SetupEventList(SetupEventList {
        events: o.require::<EventList>(tags::EVENT_LIST)?,
    }))
}

fn setup_call(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::SetupCall(SetupCall {
        alpha_id_confirm: o.alpha_nth(tags::ALPHA_ID, 0)?,
        address: o.require::<Address>(tags::ADDRESS)?,
        ccp: bytes(o, tags::CCP),
        subaddress: bytes(o, tags::SUBADDRESS),
        duration: o.decode(tags::DURATION)?,
        icon_id_confirm: o.decode_nth(tags::ICON_ID, 0)?,
        alpha_id_setup: o.alpha_nth(tags::ALPHA_ID, 1)?,
        icon_id_setup: o.decode_nth(tags::ICON_ID, 1)?,
        text_attribute_confirm: o.decode_nth(tags::TEXT_ATTRIBUTE, 0)?,
        text_attribute_setup: o.decode_nth(tags::TEXT_ATTRIBUTE, 1)?,
        frame_id: o.decode(tags::FRAME_ID)?,
    }))
}

fn send_ss(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::SendSs(SendSs {
        ss_string: o.require(tags::SS_STRING)?,
        presentation: presentation(o)?,
    }))
}

fn send_ussd(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::SendUssd(SendUssd {
        ussd_string: o.require::<UssdString>(tags::USSD_STRING)?,
        presentation: presentation(o)?,
    }))
}

fn send_sms(o: &Objects) -> Result<CommandPayload, ParseError> {
    let tpdu = match (o.get(tags::GSM_SMS_TPDU), o.get(tags::CDMA_SMS_TPDU)) {
        (Some(gsm), _) if !gsm.is_empty() => SmsTpdu::Gsm(gsm.to_vec()),
        (_, Some(cdma)) if !cdma.is_empty() => SmsTpdu::Cdma(cdma.to_vec()),
        _ => return Err(ParseError::MissingValue),
    };
    Ok(CommandPayload::SendSms(SendSms {
        address: o.decode(tags::ADDRESS)?,
        tpdu,
        presentation: presentation(o)?,
    }))
}

fn send_dtmf(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::SendDtmf(SendDtmf {
        dtmf: o.require::<DtmfString>(tags::DTMF_STRING)?,
        presentation: presentation(o)?,
    }))
}

fn launch_browser(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::LaunchBrowser(LaunchBrowser {
        browser_id: o.decode(tags::BROWSER_ID)?,
        url: ascii(o, tags::URL)?.unwrap_or_default(),
        bearer: bytes(o, tags::BEARER),
        provisioning_files: o
            .all(tags::PROVISIONING_FILE_REF)
            .into_iter()
            .map(<[u8]>::to_vec)
            .collect(),
        gateway: o.text(tags::TEXT_STRING)?,
        presentation: presentation(o)?,
    }))
}

fn play_tone(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::PlayTone(PlayTone {
        tone: o.decode(tags::TONE)?,
        duration: o.decode(tags::DURATION)?,
        presentation: presentation(o)?,
    }))
}

fn display_text(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::DisplayText(DisplayText {
        text: o.text(tags::TEXT_STRING)?.unwrap_or_default(),
        icon_id: o.decode(tags::ICON_ID)?,
        immediate_response: o.has(tags::IMMEDIATE_RESPONSE),
        duration: o.decode(tags::DURATION)?,
        text_attribute: o.decode(tags::TEXT_ATTRIBUTE)?,
        frame_id: o.decode(tags::FRAME_ID)?,
    }))
}

fn get_inkey(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::GetInkey(GetInkey {
        text: o.text(tags::TEXT_STRING)?.unwrap_or_default(),
        icon_id: o.decode(tags::ICON_ID)?,
        duration: o.decode(tags::DURATION)?,
        text_attribute: o.decode(tags::TEXT_ATTRIBUTE)?,
        frame_id: o.decode(tags::FRAME_ID)?,
    }))
}

fn get_input(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::GetInput(GetInput {
        text: o.text(tags::TEXT_STRING)?.unwrap_or_default(),
        response_length: o.require::<ResponseLength>(tags::RESPONSE_LENGTH)?,
        default_text: o.text(tags::DEFAULT_TEXT)?,
        icon_id: o.decode(tags::ICON_ID)?,
        text_attribute: o.decode(tags::TEXT_ATTRIBUTE)?,
        frame_id: o.decode(tags::FRAME_ID)?,
    }))
}

fn select_item(o: &Objects) -> Result<CommandPayload, ParseError> {
    let items = items(o)?;
    if items.is_empty() {
        return Err(ParseError::MissingValue);
    }
    Ok(CommandPayload::SelectItem(SelectItem {
        alpha_id: o.alpha(tags::ALPHA_ID)?,
        items,
        next_action: bytes(o, tags::ITEMS_NEXT_ACTION_INDICATOR),
        default_item: o.decode(tags::ITEM_ID)?,
        icon_id: o.decode(tags::ICON_ID)?,
        item_icon_ids: o.decode(tags::ITEM_ICON_ID_LIST)?,
        text_attribute: o.decode(tags::TEXT_ATTRIBUTE)?,
        item_text_attributes: o.decode(tags::ITEM_TEXT_ATTRIBUTE_LIST)?,
        frame_id: o.decode(tags::FRAME_ID)?,
    }))
}

fn setup_menu(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::SetupMenu(SetupMenu {
        alpha_id: o.alpha(tags::ALPHA_ID)?.unwrap_or_default(),
        items: items(o)?,
        next_action: bytes(o, tags::ITEMS_NEXT_ACTION_INDICATOR),
        icon_id: o.decode(tags::ICON_ID)?,
        item_icon_ids: o.decode(tags::ITEM_ICON_ID_LIST)?,
        text_attribute: o.decode(tags::TEXT_ATTRIBUTE)?,
        item_text_attributes: o.decode(tags::ITEM_TEXT_ATTRIBUTE_LIST)?,
    }))
}

fn timer_management(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::TimerManagement(TimerManagement {
        timer_id: o.require(tags::TIMER_ID)?,
        timer_value: o.decode::<TimerValue>(tags::TIMER_VALUE)?,
    }))
}

fn setup_idle_mode_text(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::SetupIdleModeText(SetupIdleModeText {
        text: o.text(tags::TEXT_STRING)?.unwrap_or_default(),
        icon_id: o.decode(tags::ICON_ID)?,
        text_attribute: o.decode(tags::TEXT_ATTRIBUTE)?,
        frame_id: o.decode(tags::FRAME_ID)?,
    }))
}

fn perform_card_apdu(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::PerformCardApdu(PerformCardApdu {
        c_apdu: o.require(tags::C_APDU)?,
    }))
}

fn run_at_command(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::RunAtCommand(RunAtCommand {
        at_command: ascii(o, tags::AT_COMMAND)?.unwrap_or_default(),
        presentation: presentation(o)?,
    }))
}

fn language_notification(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::LanguageNotification(LanguageNotification {
        language: o.decode(tags::LANGUAGE)?,
    }))
}

fn open_channel(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::OpenChannel(OpenChannel {
        bearer: o.require::<BearerDescription>(tags::BEARER_DESCRIPTION)?,
        buffer_size: o.require(tags::BUFFER_SIZE)?,
        apn: o.decode(tags::NETWORK_ACCESS_NAME)?,
        local_address: o.decode_nth(tags::OTHER_ADDRESS, 0)?,
        login: o.text_nth(tags::TEXT_STRING, 0)?,
        password: o.text_nth(tags::TEXT_STRING, 1)?,
        transport: o.decode(tags::UICC_TE_INTERFACE)?,
        destination: o.decode_nth(tags::OTHER_ADDRESS, 1)?,
        presentation: presentation(o)?,
    }))
}

fn close_channel(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::CloseChannel(CloseChannel {
        presentation: presentation(o)?,
    }))
}

fn receive_data(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::ReceiveData(ReceiveData {
        length: o.require(tags::CHANNEL_DATA_LENGTH)?,
        presentation: presentation(o)?,
    }))
}

fn send_data(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::SendData(SendData {
        data: bytes(o, tags::CHANNEL_DATA).unwrap_or_default(),
        presentation: presentation(o)?,
    }))
}

fn service_search(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::ServiceSearch(ServiceSearch {
        search: bytes(o, tags::SERVICE_SEARCH).unwrap_or_default(),
        device_filter: bytes(o, tags::DEVICE_FILTER),
        presentation: presentation(o)?,
    }))
}

fn get_service_info(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::GetServiceInfo(GetServiceInfo {
        attribute_info: bytes(o, tags::ATTRIBUTE_INFO).unwrap_or_default(),
        presentation: presentation(o)?,
    }))
}

fn declare_service(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::DeclareService(DeclareService {
        service_record: bytes(o, tags::SERVICE_RECORD).unwrap_or_default(),
        interface: o.decode(tags::UICC_TE_INTERFACE)?,
    }))
}

fn set_frames(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::SetFrames(SetFrames {
        frame_id: o.decode_nth(tags::FRAME_ID, 0)?,
        layout: bytes(o, tags::FRAME_LAYOUT),
        default_frame: o.decode_nth(tags::FRAME_ID, 1)?,
    }))
}

fn retrieve_mms(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::RetrieveMms(RetrieveMms {
        reference: bytes(o, tags::MMS_REFERENCE).unwrap_or_default(),
        files: o.require::<FileList>(tags::FILE_LIST)?,
        content_id: bytes(o, tags::MMS_CONTENT_ID).unwrap_or_default(),
        mms_id: bytes(o, tags::MMS_ID),
        presentation: presentation(o)?,
    }))
}

fn submit_mms(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::SubmitMms(SubmitMms {
        files: o.require::<FileList>(tags::FILE_LIST)?,
        mms_id: bytes(o, tags::MMS_ID),
        presentation: presentation(o)?,
    }))
}

fn display_mms(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::DisplayMms(DisplayMms {
        files: o.require::<FileList>(tags::FILE_LIST)?,
        mms_id: bytes(o, tags::MMS_ID).unwrap_or_default(),
        immediate_response: o.has(tags::IMMEDIATE_RESPONSE),
        frame_id: o.decode(tags::FRAME_ID)?,
    }))
}

fn activate(o: &Objects) -> Result<CommandPayload, ParseError> {
    Ok(CommandPayload::Activate(Activate {
        descriptor: o.require(tags::ACTIVATE_DESCRIPTOR)?,
    }))
}
