//! Per-command payloads
//!
//! Optional objects are `None` when absent. Alpha identifiers that are
//! present but empty decode to `Some(String::new())`, which the terminal
//! treats differently from an absent one.

use crate::apdu::CApdu;
use crate::objects::{
    Address, Aid, BearerDescription, DtmfString, Duration, EventList, FileList, FrameId, IconId,
    Item, ItemIconIdList, Language, NetworkAccessName, OtherAddress, ResponseLength, SsString,
    TextAttribute, TimerValue, Tone, TransportLevel, UssdString,
};

/// Alpha identifier and its presentation objects, shared by most commands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Presentation {
    pub alpha_id: Option<String>,
    pub icon_id: Option<IconId>,
    pub text_attribute: Option<TextAttribute>,
    pub frame_id: Option<FrameId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Refresh {
    pub file_list: Option<FileList>,
    pub aid: Option<Aid>,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval {
    pub duration: Duration,
}

/// An empty event list removes every registered event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetupEventList {
    pub events: EventList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupCall {
    pub alpha_id_confirm: Option<String>,
    pub address: Address,
    pub ccp: Option<Vec<u8>>,
    pub subaddress: Option<Vec<u8>>,
    pub duration: Option<Duration>,
    pub icon_id_confirm: Option<IconId>,
    pub alpha_id_setup: Option<String>,
    pub icon_id_setup: Option<IconId>,
    pub text_attribute_confirm: Option<TextAttribute>,
    pub text_attribute_setup: Option<TextAttribute>,
    pub frame_id: Option<FrameId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendSs {
    pub ss_string: SsString,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendUssd {
    pub ussd_string: UssdString,
    pub presentation: Presentation,
}

/// The TPDU of a SEND SHORT MESSAGE, kept raw for the SMS layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmsTpdu {
    Gsm(Vec<u8>),
    Cdma(Vec<u8>),
}

impl SmsTpdu {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SmsTpdu::Gsm(tpdu) | SmsTpdu::Cdma(tpdu) => tpdu,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendSms {
    pub address: Option<Address>,
    pub tpdu: SmsTpdu,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendDtmf {
    pub dtmf: DtmfString,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchBrowser {
    pub browser_id: Option<u8>,
    pub url: String,
    pub bearer: Option<Vec<u8>>,
    pub provisioning_files: Vec<Vec<u8>>,
    pub gateway: Option<String>,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayTone {
    pub tone: Option<Tone>,
    pub duration: Option<Duration>,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayText {
    pub text: String,
    pub icon_id: Option<IconId>,
    pub immediate_response: bool,
    pub duration: Option<Duration>,
    pub text_attribute: Option<TextAttribute>,
    pub frame_id: Option<FrameId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetInkey {
    pub text: String,
    pub icon_id: Option<IconId>,
    pub duration: Option<Duration>,
    pub text_attribute: Option<TextAttribute>,
    pub frame_id: Option<FrameId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetInput {
    pub text: String,
    pub response_length: ResponseLength,
    pub default_text: Option<String>,
    pub icon_id: Option<IconId>,
    pub text_attribute: Option<TextAttribute>,
    pub frame_id: Option<FrameId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectItem {
    pub alpha_id: Option<String>,
    pub items: Vec<Item>,
    pub next_action: Option<Vec<u8>>,
    pub default_item: Option<u8>,
    pub icon_id: Option<IconId>,
    pub item_icon_ids: Option<ItemIconIdList>,
    pub text_attribute: Option<TextAttribute>,
    pub item_text_attributes: Option<TextAttribute>,
    pub frame_id: Option<FrameId>,
}

/// An empty `items` list removes the menu
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetupMenu {
    pub alpha_id: String,
    pub items: Vec<Item>,
    pub next_action: Option<Vec<u8>>,
    pub icon_id: Option<IconId>,
    pub item_icon_ids: Option<ItemIconIdList>,
    pub text_attribute: Option<TextAttribute>,
    pub item_text_attributes: Option<TextAttribute>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerManagement {
    pub timer_id: u8,
    pub timer_value: Option<TimerValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetupIdleModeText {
    pub text: String,
    pub icon_id: Option<IconId>,
    pub text_attribute: Option<TextAttribute>,
    pub frame_id: Option<FrameId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformCardApdu {
    pub c_apdu: CApdu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunAtCommand {
    pub at_command: String,
    pub presentation: Presentation,
}

/// `None` means no specific language is in use any more
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageNotification {
    pub language: Option<Language>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenChannel {
    pub bearer: BearerDescription,
    pub buffer_size: u16,
    pub apn: Option<NetworkAccessName>,
    pub local_address: Option<OtherAddress>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub transport: Option<TransportLevel>,
    pub destination: Option<OtherAddress>,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CloseChannel {
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReceiveData {
    pub length: u8,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SendData {
    pub data: Vec<u8>,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceSearch {
    pub search: Vec<u8>,
    pub device_filter: Option<Vec<u8>>,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetServiceInfo {
    pub attribute_info: Vec<u8>,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclareService {
    pub service_record: Vec<u8>,
    pub interface: Option<TransportLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetFrames {
    pub frame_id: Option<FrameId>,
    pub layout: Option<Vec<u8>>,
    pub default_frame: Option<FrameId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RetrieveMms {
    pub reference: Vec<u8>,
    pub files: FileList,
    pub content_id: Vec<u8>,
    pub mms_id: Option<Vec<u8>>,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmitMms {
    pub files: FileList,
    pub mms_id: Option<Vec<u8>>,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayMms {
    pub files: FileList,
    pub mms_id: Vec<u8>,
    pub immediate_response: bool,
    pub frame_id: Option<FrameId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activate {
    pub descriptor: u8,
}

/// Command-specific content of a proactive command
///
/// Commands that carry nothing beyond the header (MORE TIME, POLLING OFF,
/// PROVIDE LOCAL INFORMATION, the card reader and status queries) use
/// `None`, as does any command whose objects failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommandPayload {
    #[default]
    None,
    Refresh(Refresh),
    PollInterval(PollInterval),
    SetupEventList(SetupEventList),
    SetupCall(SetupCall),
    SendSs(SendSs),
    SendUssd(SendUssd),
    SendSms(SendSms),
    SendDtmf(SendDtmf),
    LaunchBrowser(LaunchBrowser),
    PlayTone(PlayTone),
    DisplayText(DisplayText),
    GetInkey(GetInkey),
    GetInput(GetInput),
    SelectItem(SelectItem),
    SetupMenu(SetupMenu),
    TimerManagement(TimerManagement),
    SetupIdleModeText(SetupIdleModeText),
    PerformCardApdu(PerformCardApdu),
    RunAtCommand(RunAtCommand),
    LanguageNotification(LanguageNotification),
    OpenChannel(OpenChannel),
    CloseChannel(CloseChannel),
    ReceiveData(ReceiveData),
    SendData(SendData),
    ServiceSearch(ServiceSearch),
    GetServiceInfo(GetServiceInfo),
    DeclareService(DeclareService),
    SetFrames(SetFrames),
    RetrieveMms(RetrieveMms),
    SubmitMms(SubmitMms),
    DisplayMms(DisplayMms),
    Activate(Activate),
}
