//! EVENT DOWNLOAD events
//!
//! Each event envelope carries an event list with exactly one entry, the
//! device identities and the objects of that event.

use crate::command::walker::{opt, val, Objects, Rule};
use crate::command::ParseError;
use crate::objects::{
    Address, BrowserTerminationCause, CardReaderStatus, ChannelStatus, DeviceIdentity, EventType,
    Language, LocationInfo, LocationStatus, ObjectError, ObjectWriter,
};
use crate::tlv::{tags, TlvBuilder};

/// One event reported to the UICC
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    MtCall {
        transaction_id: u8,
        address: Option<Address>,
        subaddress: Option<Vec<u8>>,
    },
    CallConnected {
        transaction_id: u8,
    },
    CallDisconnected {
        transaction_ids: Vec<u8>,
        /// `Some` with an empty value reports a radio link failure
        cause: Option<Vec<u8>>,
    },
    LocationStatus {
        status: LocationStatus,
        location: Option<LocationInfo>,
    },
    UserActivity,
    IdleScreenAvailable,
    CardReaderStatus(CardReaderStatus),
    LanguageSelection(Language),
    BrowserTermination(BrowserTerminationCause),
    DataAvailable {
        channel_status: ChannelStatus,
        length: u8,
    },
    ChannelStatus(ChannelStatus),
    AccessTechnologyChange(u8),
    DisplayParametersChanged(Vec<u8>),
    LocalConnection {
        service_record: Vec<u8>,
    },
    NetworkSearchModeChange(u8),
    BrowsingStatus(Vec<u8>),
    FramesInformationChange(Vec<u8>),
}

const MT_CALL: &[Rule] = &[
    val(tags::DEVICE_IDENTITIES),
    val(tags::TRANSACTION_ID),
    opt(tags::ADDRESS),
    opt(tags::SUBADDRESS),
];
const CALL_CONNECTED: &[Rule] = &[val(tags::DEVICE_IDENTITIES), val(tags::TRANSACTION_ID)];
const CALL_DISCONNECTED: &[Rule] = &[
    val(tags::DEVICE_IDENTITIES),
    val(tags::TRANSACTION_ID),
    opt(tags::CAUSE),
];
const LOCATION_STATUS: &[Rule] = &[
    val(tags::DEVICE_IDENTITIES),
    val(tags::LOCATION_STATUS),
    opt(tags::LOCATION_INFO),
];
const DEVICES_ONLY: &[Rule] = &[val(tags::DEVICE_IDENTITIES)];
const CARD_READER_STATUS: &[Rule] = &[val(tags::DEVICE_IDENTITIES), val(tags::CARD_READER_STATUS)];
const LANGUAGE_SELECTION: &[Rule] = &[val(tags::DEVICE_IDENTITIES), val(tags::LANGUAGE)];
const BROWSER_TERMINATION: &[Rule] = &[
    val(tags::DEVICE_IDENTITIES),
    val(tags::BROWSER_TERMINATION_CAUSE),
];
const DATA_AVAILABLE: &[Rule] = &[
    val(tags::DEVICE_IDENTITIES),
    val(tags::CHANNEL_STATUS),
    val(tags::CHANNEL_DATA_LENGTH),
];
const CHANNEL_STATUS: &[Rule] = &[val(tags::DEVICE_IDENTITIES), val(tags::CHANNEL_STATUS)];
const ACCESS_TECHNOLOGY: &[Rule] = &[val(tags::DEVICE_IDENTITIES), val(tags::ACCESS_TECHNOLOGY)];
const DISPLAY_PARAMETERS: &[Rule] = &[val(tags::DEVICE_IDENTITIES), val(tags::DISPLAY_PARAMETERS)];
const LOCAL_CONNECTION: &[Rule] = &[val(tags::DEVICE_IDENTITIES), val(tags::SERVICE_RECORD)];
const SEARCH_MODE: &[Rule] = &[val(tags::DEVICE_IDENTITIES), val(tags::NETWORK_SEARCH_MODE)];
const BROWSING_STATUS: &[Rule] = &[val(tags::DEVICE_IDENTITIES), val(tags::BROWSING_STATUS)];
const FRAMES_INFO: &[Rule] = &[val(tags::DEVICE_IDENTITIES), val(tags::FRAMES_INFO)];

impl Event {
    pub fn event_type(&self) -> EventType {
        match self {
            Event::MtCall { .. } => EventType::MtCall,
            Event::CallConnected { .. } => EventType::CallConnected,
            Event::CallDisconnected { .. } => EventType::CallDisconnected,
            Event::LocationStatus { .. } => EventType::LocationStatus,
            Event::UserActivity => EventType::UserActivity,
            Event::IdleScreenAvailable => EventType::IdleScreenAvailable,
            Event::CardReaderStatus(_) => EventType::CardReaderStatus,
            Event::LanguageSelection(_) => EventType::LanguageSelection,
            Event::BrowserTermination(_) => EventType::BrowserTermination,
            Event::DataAvailable { .. } => EventType::DataAvailable,
            Event::ChannelStatus(_) => EventType::ChannelStatus,
            Event::AccessTechnologyChange(_) => EventType::AccessTechnologyChange,
            Event::DisplayParametersChanged(_) => EventType::DisplayParametersChanged,
            Event::LocalConnection { .. } => EventType::LocalConnection,
            Event::NetworkSearchModeChange(_) => EventType::NetworkSearchModeChange,
            Event::BrowsingStatus(_) => EventType::BrowsingStatus,
            Event::FramesInformationChange(_) => EventType::FramesInformationChange,
        }
    }

    /// Device the event usually comes from
    pub fn default_source(&self) -> DeviceIdentity {
        match self {
            Event::MtCall { .. } => DeviceIdentity::Network,
            Event::IdleScreenAvailable => DeviceIdentity::Display,
            _ => DeviceIdentity::Terminal,
        }
    }

    /// Append the event-specific objects
    pub(crate) fn encode(&self, builder: &mut TlvBuilder) -> Result<(), ObjectError> {
        match self {
            Event::MtCall {
                transaction_id,
                address,
                subaddress,
            } => {
                builder.put(tags::TRANSACTION_ID, true, transaction_id)?;
                builder.put_opt(tags::ADDRESS, true, address.as_ref())?;
                builder.put_opt(tags::SUBADDRESS, true, subaddress.as_ref())?;
            }
            Event::CallConnected { transaction_id } => {
                builder.put(tags::TRANSACTION_ID, true, transaction_id)?;
            }
            Event::CallDisconnected {
                transaction_ids,
                cause,
            } => {
                builder.put(tags::TRANSACTION_ID, true, transaction_ids)?;
                builder.put_opt(tags::CAUSE, true, cause.as_ref())?;
            }
            Event::LocationStatus { status, location } => {
                builder.put(tags::LOCATION_STATUS, true, status)?;
                builder.put_opt(tags::LOCATION_INFO, true, location.as_ref())?;
            }
            Event::UserActivity | Event::IdleScreenAvailable => {}
            Event::CardReaderStatus(status) => builder.put(tags::CARD_READER_STATUS, true, status)?,
            Event::LanguageSelection(language) => builder.put(tags::LANGUAGE, true, language)?,
            Event::BrowserTermination(cause) => {
                builder.put(tags::BROWSER_TERMINATION_CAUSE, true, cause)?
            }
            Event::DataAvailable {
                channel_status,
                length,
            } => {
                builder.put(tags::CHANNEL_STATUS, true, channel_status)?;
                builder.put(tags::CHANNEL_DATA_LENGTH, true, length)?;
            }
            Event::ChannelStatus(status) => builder.put(tags::CHANNEL_STATUS, true, status)?,
            Event::AccessTechnologyChange(tech) => {
                builder.put(tags::ACCESS_TECHNOLOGY, true, tech)?
            }
            Event::DisplayParametersChanged(parameters) => {
                builder.put(tags::DISPLAY_PARAMETERS, true, parameters)?
            }
            Event::LocalConnection { service_record } => {
                builder.put(tags::SERVICE_RECORD, true, service_record)?
            }
            Event::NetworkSearchModeChange(mode) => {
                builder.put(tags::NETWORK_SEARCH_MODE, true, mode)?
            }
            Event::BrowsingStatus(status) => builder.put(tags::BROWSING_STATUS, true, status)?,
            Event::FramesInformationChange(info) => builder.put(tags::FRAMES_INFO, true, info)?,
        }
        Ok(())
    }

    /// Objects following the event list, device identities first
    pub(crate) fn rules(event_type: EventType) -> Option<&'static [Rule]> {
        let rules = match event_type {
            EventType::MtCall => MT_CALL,
            EventType::CallConnected => CALL_CONNECTED,
            EventType::CallDisconnected => CALL_DISCONNECTED,
            EventType::LocationStatus => LOCATION_STATUS,
            EventType::UserActivity | EventType::IdleScreenAvailable => DEVICES_ONLY,
            EventType::CardReaderStatus => CARD_READER_STATUS,
            EventType::LanguageSelection => LANGUAGE_SELECTION,
            EventType::BrowserTermination => BROWSER_TERMINATION,
            EventType::DataAvailable => DATA_AVAILABLE,
            EventType::ChannelStatus => CHANNEL_STATUS,
            EventType::AccessTechnologyChange => ACCESS_TECHNOLOGY,
            EventType::DisplayParametersChanged => DISPLAY_PARAMETERS,
            EventType::LocalConnection => LOCAL_CONNECTION,
            EventType::NetworkSearchModeChange => SEARCH_MODE,
            EventType::BrowsingStatus => BROWSING_STATUS,
            EventType::FramesInformationChange => FRAMES_INFO,
            EventType::Unknown(_) => return None,
        };
        Some(rules)
    }

    pub(crate) fn decode(event_type: EventType, o: &Objects<'_>) -> Result<Self, ParseError> {
        let bytes = |tag| o.get(tag).map(<[u8]>::to_vec).unwrap_or_default();
        let event = match event_type {
            EventType::MtCall => Event::MtCall {
                transaction_id: o.require(tags::TRANSACTION_ID)?,
                address: o.decode(tags::ADDRESS)?,
                subaddress: o.get(tags::SUBADDRESS).map(<[u8]>::to_vec),
            },
            EventType::CallConnected => Event::CallConnected {
                transaction_id: o.require(tags::TRANSACTION_ID)?,
            },
            EventType::CallDisconnected => Event::CallDisconnected {
                transaction_ids: bytes(tags::TRANSACTION_ID),
                cause: o.get(tags::CAUSE).map(<[u8]>::to_vec),
            },
            EventType::LocationStatus => Event::LocationStatus {
                status: o.require(tags::LOCATION_STATUS)?,
                location: o.decode(tags::LOCATION_INFO)?,
            },
            EventType::UserActivity => Event::UserActivity,
            EventType::IdleScreenAvailable => Event::IdleScreenAvailable,
            EventType::CardReaderStatus => {
                Event::CardReaderStatus(o.require(tags::CARD_READER_STATUS)?)
            }
            EventType::LanguageSelection => Event::LanguageSelection(o.require(tags::LANGUAGE)?),
            EventType::BrowserTermination => {
                Event::BrowserTermination(o.require(tags::BROWSER_TERMINATION_CAUSE)?)
            }
            EventType::DataAvailable => Event::DataAvailable {
                channel_status: o.require(tags::CHANNEL_STATUS)?,
                length: o.require(tags::CHANNEL_DATA_LENGTH)?,
            },
            EventType::ChannelStatus => Event::ChannelStatus(o.require(tags::CHANNEL_STATUS)?),
            EventType::AccessTechnologyChange => {
                Event::AccessTechnologyChange(o.require(tags::ACCESS_TECHNOLOGY)?)
            }
            EventType::DisplayParametersChanged => {
                Event::DisplayParametersChanged(bytes(tags::DISPLAY_PARAMETERS))
            }
            EventType::LocalConnection => Event::LocalConnection {
                service_record: bytes(tags::SERVICE_RECORD),
            },
            EventType::NetworkSearchModeChange => {
                Event::NetworkSearchModeChange(o.require(tags::NETWORK_SEARCH_MODE)?)
            }
            EventType::BrowsingStatus => Event::BrowsingStatus(bytes(tags::BROWSING_STATUS)),
            EventType::FramesInformationChange => {
                Event::FramesInformationChange(bytes(tags::FRAMES_INFO))
            }
            EventType::Unknown(_) => return Err(ParseError::DataNotUnderstood),
        };
        Ok(event)
    }
}
