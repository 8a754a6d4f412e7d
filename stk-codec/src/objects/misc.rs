//! Device identities, results, events and the smaller fixed-shape objects

use super::{expect_len, DataObject, ObjectError};

byte_enum! {
    /// Device identity (TS 102.223 §8.7)
    pub enum DeviceIdentity {
        Keypad = 0x01,
        Display = 0x02,
        Earpiece = 0x03,
        CardReader0 = 0x10,
        CardReader1 = 0x11,
        CardReader2 = 0x12,
        CardReader3 = 0x13,
        CardReader4 = 0x14,
        CardReader5 = 0x15,
        CardReader6 = 0x16,
        CardReader7 = 0x17,
        Channel1 = 0x21,
        Channel2 = 0x22,
        Channel3 = 0x23,
        Channel4 = 0x24,
        Channel5 = 0x25,
        Channel6 = 0x26,
        Channel7 = 0x27,
        Uicc = 0x81,
        Terminal = 0x82,
        Network = 0x83,
    }
}

/// Source and destination device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceIdentities {
    pub src: DeviceIdentity,
    pub dst: DeviceIdentity,
}

impl DeviceIdentities {
    pub fn new(src: DeviceIdentity, dst: DeviceIdentity) -> Self {
        Self { src, dst }
    }
}

impl DataObject for DeviceIdentities {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("device identities", value, 2)?;
        Ok(Self {
            src: value[0].into(),
            dst: value[1].into(),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.extend_from_slice(&[self.src.into(), self.dst.into()]);
        Ok(())
    }
}

byte_enum! {
    /// General result (§8.12)
    pub enum ResultType {
        Success = 0x00,
        PartialComprehension = 0x01,
        MissingInformation = 0x02,
        RefreshAdditionalEfRead = 0x03,
        NoIcon = 0x04,
        ModifiedByCallControl = 0x05,
        LimitedService = 0x06,
        WithModification = 0x07,
        RefreshNaaNotActive = 0x08,
        ToneNotPlayed = 0x09,
        UserTerminated = 0x10,
        GoBack = 0x11,
        NoResponse = 0x12,
        HelpRequested = 0x13,
        UssdOrSsTerminatedByUser = 0x14,
        TerminalBusy = 0x20,
        NetworkUnavailable = 0x21,
        UserRejected = 0x22,
        UserClearedDownCall = 0x23,
        TimerConflict = 0x24,
        CallControlTemporary = 0x25,
        BrowserError = 0x26,
        MmsTemporary = 0x27,
        BeyondCapabilities = 0x30,
        TypeNotUnderstood = 0x31,
        DataNotUnderstood = 0x32,
        NumberNotUnderstood = 0x33,
        SsReturnError = 0x34,
        SmsRpError = 0x35,
        MissingValue = 0x36,
        UssdReturnError = 0x37,
        MultipleCardError = 0x38,
        CallControlPermanent = 0x39,
        BipError = 0x3A,
        AccessTechnologyError = 0x3B,
        FramesError = 0x3C,
        MmsError = 0x3D,
    }
}

impl ResultType {
    /// Results 0x0X: the command was performed
    pub fn is_success(&self) -> bool {
        u8::from(*self) < 0x10
    }

    /// Results that must be followed by an additional information byte
    pub fn requires_additional_info(&self) -> bool {
        matches!(
            u8::from(*self),
            0x20 | 0x21 | 0x26 | 0x34 | 0x35 | 0x37 | 0x38 | 0x39 | 0x3A | 0x3C
        )
    }
}

/// Result object: general result plus additional information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralResult {
    pub result_type: ResultType,
    pub additional: Vec<u8>,
}

impl GeneralResult {
    pub fn new(result_type: ResultType) -> Self {
        Self {
            result_type,
            additional: Vec::new(),
        }
    }

    pub fn with_additional(result_type: ResultType, additional: Vec<u8>) -> Self {
        Self {
            result_type,
            additional,
        }
    }

    pub fn success() -> Self {
        Self::new(ResultType::Success)
    }
}

impl DataObject for GeneralResult {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        let (&code, additional) = value.split_first().ok_or(ObjectError::InvalidLength {
            object: "result",
            length: 0,
        })?;
        Ok(Self {
            result_type: code.into(),
            additional: additional.to_vec(),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.push(self.result_type.into());
        out.extend_from_slice(&self.additional);
        Ok(())
    }
}

byte_enum! {
    /// Event list entries (§8.25)
    pub enum EventType {
        MtCall = 0x00,
        CallConnected = 0x01,
        CallDisconnected = 0x02,
        LocationStatus = 0x03,
        UserActivity = 0x04,
        IdleScreenAvailable = 0x05,
        CardReaderStatus = 0x06,
        LanguageSelection = 0x07,
        BrowserTermination = 0x08,
        DataAvailable = 0x09,
        ChannelStatus = 0x0A,
        AccessTechnologyChange = 0x0B,
        DisplayParametersChanged = 0x0C,
        LocalConnection = 0x0D,
        NetworkSearchModeChange = 0x0E,
        BrowsingStatus = 0x0F,
        FramesInformationChange = 0x10,
    }
}

/// Event list: one byte per event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventList(pub Vec<EventType>);

impl DataObject for EventList {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        Ok(Self(value.iter().map(|&b| b.into()).collect()))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.extend(self.0.iter().map(|&e| u8::from(e)));
        Ok(())
    }
}

byte_enum! {
    /// Tone (§8.16)
    pub enum Tone {
        DialTone = 0x01,
        CalledSubscriberBusy = 0x02,
        Congestion = 0x03,
        RadioPathAck = 0x04,
        RadioPathNotAvailable = 0x05,
        ErrorSpecialInfo = 0x06,
        CallWaiting = 0x07,
        Ringing = 0x08,
        GeneralBeep = 0x10,
        PositiveAck = 0x11,
        NegativeAck = 0x12,
        UserRinging = 0x13,
        UserSmsAlert = 0x14,
        CriticalAlert = 0x15,
        VibrateOnly = 0x20,
        Happy = 0x30,
        Sad = 0x31,
        UrgentAction = 0x32,
        Question = 0x33,
        MessageReceived = 0x34,
        Melody1 = 0x40,
        Melody2 = 0x41,
        Melody3 = 0x42,
        Melody4 = 0x43,
        Melody5 = 0x44,
        Melody6 = 0x45,
        Melody7 = 0x46,
        Melody8 = 0x47,
    }
}

byte_object!(Tone, "tone");

byte_enum! {
    /// Browser termination cause (§8.51)
    pub enum BrowserTerminationCause {
        UserTermination = 0x00,
        ErrorTermination = 0x01,
    }
}

byte_object!(BrowserTerminationCause, "browser termination cause");

const MASTER_FILE: [u8; 2] = [0x3F, 0x00];

/// File list (§8.18): full paths, each starting at the MF
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileList(pub Vec<Vec<u8>>);

impl DataObject for FileList {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        let (&declared, data) = value.split_first().ok_or(ObjectError::InvalidLength {
            object: "file list",
            length: 0,
        })?;
        if data.len() % 2 != 0 {
            return Err(ObjectError::InvalidLength {
                object: "file list",
                length: value.len(),
            });
        }

        let mut files: Vec<Vec<u8>> = Vec::new();
        for id in data.chunks_exact(2) {
            if id == MASTER_FILE {
                files.push(id.to_vec());
                continue;
            }
            match files.last_mut() {
                Some(path) => path.extend_from_slice(id),
                None => {
                    return Err(ObjectError::InvalidValue {
                        object: "file path",
                        value: id[0],
                    })
                }
            }
        }

        if files.len() != declared as usize {
            return Err(ObjectError::CountMismatch {
                object: "file list",
                declared: declared as usize,
                found: files.len(),
            });
        }
        Ok(Self(files))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        if self.0.len() > 0xFF {
            return Err(ObjectError::InvalidLength {
                object: "file list",
                length: self.0.len(),
            });
        }
        out.push(self.0.len() as u8);
        for path in &self.0 {
            if !path.starts_with(&MASTER_FILE) || path.len() % 2 != 0 {
                return Err(ObjectError::InvalidLength {
                    object: "file path",
                    length: path.len(),
                });
            }
            out.extend_from_slice(path);
        }
        Ok(())
    }
}

/// Application identifier (§8.60), 1 to 16 bytes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aid(pub Vec<u8>);

impl DataObject for Aid {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        if value.is_empty() || value.len() > 16 {
            return Err(ObjectError::InvalidLength {
                object: "AID",
                length: value.len(),
            });
        }
        Ok(Self(value.to_vec()))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.extend_from_slice(&self.0);
        Ok(())
    }
}

/// Frame identifier (§8.80)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameId(pub u8);

impl DataObject for FrameId {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("frame identifier", value, 1)?;
        if value[0] >= 0x10 {
            return Err(ObjectError::InvalidValue {
                object: "frame identifier",
                value: value[0],
            });
        }
        Ok(Self(value[0]))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.push(self.0);
        Ok(())
    }
}

/// Language (§8.45): two-letter ISO 639 code
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Language(pub String);

impl DataObject for Language {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("language", value, 2)?;
        if !value.is_ascii() {
            return Err(ObjectError::InvalidValue {
                object: "language",
                value: value[0],
            });
        }
        Ok(Self(String::from_utf8_lossy(value).into_owned()))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        if self.0.len() != 2 || !self.0.is_ascii() {
            return Err(ObjectError::InvalidLength {
                object: "language",
                length: self.0.len(),
            });
        }
        out.extend_from_slice(self.0.as_bytes());
        Ok(())
    }
}

/// Card reader status (§8.33)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardReaderStatus {
    pub id: u8,
    pub removable: bool,
    pub present: bool,
    pub id1_size: bool,
    pub card_present: bool,
    pub card_powered: bool,
}

impl DataObject for CardReaderStatus {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("card reader status", value, 1)?;
        let b = value[0];
        Ok(Self {
            id: b & 0x07,
            removable: b & 0x08 != 0,
            present: b & 0x10 != 0,
            id1_size: b & 0x20 != 0,
            card_present: b & 0x40 != 0,
            card_powered: b & 0x80 != 0,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        let mut b = self.id & 0x07;
        for (flag, bit) in [
            (self.removable, 0x08),
            (self.present, 0x10),
            (self.id1_size, 0x20),
            (self.card_present, 0x40),
            (self.card_powered, 0x80),
        ] {
            if flag {
                b |= bit;
            }
        }
        out.push(b);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_identities() {
        let ids = DeviceIdentities::decode(&[0x81, 0x82]).unwrap();
        assert_eq!(ids.src, DeviceIdentity::Uicc);
        assert_eq!(ids.dst, DeviceIdentity::Terminal);
        assert_eq!(DeviceIdentity::from(0x21), DeviceIdentity::Channel1);
        assert_eq!(DeviceIdentity::from(0x44), DeviceIdentity::Unknown(0x44));
        assert!(DeviceIdentities::decode(&[0x81]).is_err());
    }

    #[test]
    fn test_general_result() {
        let result = GeneralResult::decode(&[0x20, 0x02]).unwrap();
        assert_eq!(result.result_type, ResultType::TerminalBusy);
        assert_eq!(result.additional, vec![0x02]);
        assert!(result.result_type.requires_additional_info());
        assert!(!result.result_type.is_success());
        assert!(ResultType::NoIcon.is_success());
        assert!(GeneralResult::decode(&[]).is_err());
    }

    #[test]
    fn test_event_list() {
        let list = EventList::decode(&[0x00, 0x05, 0x42]).unwrap();
        assert_eq!(
            list.0,
            vec![EventType::MtCall, EventType::IdleScreenAvailable, EventType::Unknown(0x42)]
        );
        assert_eq!(list.to_value().unwrap(), vec![0x00, 0x05, 0x42]);
    }

    #[test]
    fn test_file_list() {
        let value = hex::decode("023F007F206F303F007F106F3A").unwrap();
        let files = FileList::decode(&value).unwrap();
        assert_eq!(files.0.len(), 2);
        assert_eq!(files.0[0], vec![0x3F, 0x00, 0x7F, 0x20, 0x6F, 0x30]);
        assert_eq!(files.to_value().unwrap(), value);
    }

    #[test]
    fn test_file_list_errors() {
        let value = hex::decode("033F007F206F30").unwrap();
        assert_eq!(
            FileList::decode(&value),
            Err(ObjectError::CountMismatch { object: "file list", declared: 3, found: 1 })
        );
        assert!(FileList::decode(&hex::decode("017F206F30").unwrap()).is_err());
        assert!(FileList::decode(&hex::decode("013F007F").unwrap()).is_err());
    }

    #[test]
    fn test_aid_and_frame_id() {
        assert!(Aid::decode(&[]).is_err());
        assert!(Aid::decode(&[0xA0; 17]).is_err());
        assert_eq!(Aid::decode(&[0xA0, 0x00]).unwrap().0, vec![0xA0, 0x00]);
        assert_eq!(FrameId::decode(&[0x0F]).unwrap(), FrameId(0x0F));
        assert!(FrameId::decode(&[0x10]).is_err());
    }

    #[test]
    fn test_language() {
        assert_eq!(Language::decode(b"en").unwrap().0, "en");
        assert_eq!(Language("se".to_string()).to_value().unwrap(), b"se".to_vec());
        assert!(Language("eng".to_string()).to_value().is_err());
    }

    #[test]
    fn test_card_reader_status() {
        let status = CardReaderStatus::decode(&[0xD9]).unwrap();
        assert_eq!(status.id, 1);
        assert!(status.removable);
        assert!(status.present);
        assert!(!status.id1_size);
        assert!(status.card_present);
        assert!(status.card_powered);
        assert_eq!(status.to_value().unwrap(), vec![0xD9]);
    }

    #[test]
    fn test_tone() {
        assert_eq!(Tone::decode(&[0x10]).unwrap(), Tone::GeneralBeep);
        assert_eq!(Tone::Melody8.to_value().unwrap(), vec![0x47]);
    }
}
