//! COMPREHENSION-TLV encoding and decoding
//!
//! SIM Toolkit data objects are COMPREHENSION-TLVs (ETSI TS 101 220 §7.1.1):
//! the top bit of the tag byte is the "comprehension required" flag and the
//! length follows the BER short/long form. Proactive commands and envelopes
//! are additionally wrapped in a single-byte BER-TLV.
//!
//! # Example
//! ```ignore
//! use stk_codec::tlv::{read_ber, TlvReader};
//!
//! let pdu = [0xD0, 0x09, 0x81, 0x03, 0x01, 0x01, 0x04, 0x82, 0x02, 0x81, 0x82];
//! let (tag, body) = read_ber(&pdu, false).unwrap();
//! for tlv in TlvReader::new(body) {
//!     let tlv = tlv.unwrap();
//!     println!("Tag: 0x{:02X}, Length: {}", tlv.tag, tlv.len());
//! }
//! ```

mod encoder;
mod parser;

pub use encoder::{TlvBuilder, TlvEncoder};
pub use parser::{
    parse_length, parse_tag, read_ber, read_list, read_single, ComprehensionTlv, TlvError,
    TlvReader, MAX_LENGTH,
};

/// Convert a byte slice to a hex string for logging
pub fn hexify(value: &[u8]) -> String {
    value.iter().map(|b| format!("{:02X}", b)).collect::<Vec<_>>().join(" ")
}

/// BER-TLV wrapper tags (ETSI TS 101 220 §7.2)
pub mod ber {
    pub const PROACTIVE_COMMAND: u8 = 0xD0;
    pub const SMS_PP_DOWNLOAD: u8 = 0xD1;
    pub const CBS_PP_DOWNLOAD: u8 = 0xD2;
    pub const MENU_SELECTION: u8 = 0xD3;
    pub const CALL_CONTROL: u8 = 0xD4;
    pub const MO_SHORT_MESSAGE_CONTROL: u8 = 0xD5;
    pub const EVENT_DOWNLOAD: u8 = 0xD6;
    pub const TIMER_EXPIRATION: u8 = 0xD7;
    pub const USSD_DOWNLOAD: u8 = 0xD9;
}

/// Data object tags (ETSI TS 101 220 §7.2, TS 102.223 §9.3), CR bit clear
pub mod tags {
    pub const COMMAND_DETAILS: u16 = 0x01;
    pub const DEVICE_IDENTITIES: u16 = 0x02;
    pub const RESULT: u16 = 0x03;
    pub const DURATION: u16 = 0x04;
    pub const ALPHA_ID: u16 = 0x05;
    pub const ADDRESS: u16 = 0x06;
    pub const CCP: u16 = 0x07;
    pub const SUBADDRESS: u16 = 0x08;
    pub const SS_STRING: u16 = 0x09;
    pub const USSD_STRING: u16 = 0x0A;
    pub const GSM_SMS_TPDU: u16 = 0x0B;
    pub const CBS_PAGE: u16 = 0x0C;
    pub const TEXT_STRING: u16 = 0x0D;
    pub const TONE: u16 = 0x0E;
    pub const ITEM: u16 = 0x0F;
    pub const ITEM_ID: u16 = 0x10;
    pub const RESPONSE_LENGTH: u16 = 0x11;
    pub const FILE_LIST: u16 = 0x12;
    pub const LOCATION_INFO: u16 = 0x13;
    pub const IMEI: u16 = 0x14;
    pub const HELP_REQUEST: u16 = 0x15;
    pub const NETWORK_MEASUREMENT_RESULTS: u16 = 0x16;
    pub const DEFAULT_TEXT: u16 = 0x17;
    pub const ITEMS_NEXT_ACTION_INDICATOR: u16 = 0x18;
    pub const EVENT_LIST: u16 = 0x19;
    pub const CAUSE: u16 = 0x1A;
    pub const LOCATION_STATUS: u16 = 0x1B;
    pub const TRANSACTION_ID: u16 = 0x1C;
    pub const BCCH_CHANNEL_LIST: u16 = 0x1D;
    pub const ICON_ID: u16 = 0x1E;
    pub const ITEM_ICON_ID_LIST: u16 = 0x1F;
    pub const CARD_READER_STATUS: u16 = 0x20;
    pub const CARD_ATR: u16 = 0x21;
    pub const C_APDU: u16 = 0x22;
    pub const R_APDU: u16 = 0x23;
    pub const TIMER_ID: u16 = 0x24;
    pub const TIMER_VALUE: u16 = 0x25;
    pub const DATETIME_TIMEZONE: u16 = 0x26;
    pub const CALL_CONTROL_REQUESTED_ACTION: u16 = 0x27;
    pub const AT_COMMAND: u16 = 0x28;
    pub const AT_RESPONSE: u16 = 0x29;
    pub const BC_REPEAT_INDICATOR: u16 = 0x2A;
    pub const IMMEDIATE_RESPONSE: u16 = 0x2B;
    pub const DTMF_STRING: u16 = 0x2C;
    pub const LANGUAGE: u16 = 0x2D;
    pub const TIMING_ADVANCE: u16 = 0x2E;
    pub const AID: u16 = 0x2F;
    pub const BROWSER_ID: u16 = 0x30;
    pub const URL: u16 = 0x31;
    pub const BEARER: u16 = 0x32;
    pub const PROVISIONING_FILE_REF: u16 = 0x33;
    pub const BROWSER_TERMINATION_CAUSE: u16 = 0x34;
    pub const BEARER_DESCRIPTION: u16 = 0x35;
    pub const CHANNEL_DATA: u16 = 0x36;
    pub const CHANNEL_DATA_LENGTH: u16 = 0x37;
    pub const CHANNEL_STATUS: u16 = 0x38;
    pub const BUFFER_SIZE: u16 = 0x39;
    pub const CARD_READER_ID: u16 = 0x3A;
    pub const UICC_TE_INTERFACE: u16 = 0x3C;
    pub const OTHER_ADDRESS: u16 = 0x3E;
    pub const ACCESS_TECHNOLOGY: u16 = 0x3F;
    pub const DISPLAY_PARAMETERS: u16 = 0x40;
    pub const SERVICE_RECORD: u16 = 0x41;
    pub const DEVICE_FILTER: u16 = 0x42;
    pub const SERVICE_SEARCH: u16 = 0x43;
    pub const ATTRIBUTE_INFO: u16 = 0x44;
    pub const ESN: u16 = 0x46;
    pub const NETWORK_ACCESS_NAME: u16 = 0x47;
    pub const CDMA_SMS_TPDU: u16 = 0x48;
    pub const TEXT_ATTRIBUTE: u16 = 0x50;
    pub const ITEM_TEXT_ATTRIBUTE_LIST: u16 = 0x51;
    pub const IMEISV: u16 = 0x62;
    pub const BATTERY_STATE: u16 = 0x63;
    pub const BROWSING_STATUS: u16 = 0x64;
    pub const NETWORK_SEARCH_MODE: u16 = 0x65;
    pub const FRAME_LAYOUT: u16 = 0x66;
    pub const FRAMES_INFO: u16 = 0x67;
    pub const FRAME_ID: u16 = 0x68;
    pub const MMS_REFERENCE: u16 = 0x6A;
    pub const MMS_ID: u16 = 0x6B;
    pub const MMS_CONTENT_ID: u16 = 0x6E;
    pub const ACTIVATE_DESCRIPTOR: u16 = 0x7B;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hexify() {
        assert_eq!(hexify(&[0xD0, 0x09, 0x81]), "D0 09 81");
        assert_eq!(hexify(&[]), "");
    }

    #[test]
    fn test_wrapper_round_trip() {
        let mut builder = TlvBuilder::new();
        builder.push(tags::COMMAND_DETAILS, true, &[0x01, 0x01, 0x04]).unwrap();
        builder.push(tags::DEVICE_IDENTITIES, true, &[0x81, 0x82]).unwrap();
        let pdu = builder.wrap(ber::PROACTIVE_COMMAND).unwrap();
        assert_eq!(pdu, hex::decode("D009810301010482028182").unwrap());

        let (tag, body) = read_ber(&pdu, true).unwrap();
        assert_eq!(tag, ber::PROACTIVE_COMMAND);
        let tlvs = read_list(body, true).unwrap();
        assert_eq!(tlvs[0].tag, tags::COMMAND_DETAILS);
        assert_eq!(tlvs[1].value, &[0x81, 0x82]);
    }
}
