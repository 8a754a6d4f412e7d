//! PROVIDE LOCAL INFORMATION answers
//!
//! The command qualifier says which piece of information was asked for,
//! and the response carries exactly the objects for that piece.

use crate::command::walker::{opt, Objects, Rule};
use crate::command::ParseError;
use crate::objects::{
    expect_len, BcchChannelList, DateTimeTimezone, Imei, Imeisv, Language,
    LocationInfo, ObjectError, ObjectWriter, TimingAdvance,
};
use crate::tlv::{tags, TlvBuilder};

byte_enum! {
    /// PROVIDE LOCAL INFORMATION qualifier
    pub enum LocalInfoKind {
        Location = 0x00,
        Imei = 0x01,
        NetworkMeasurement = 0x02,
        DateTime = 0x03,
        Language = 0x04,
        TimingAdvance = 0x05,
        AccessTechnology = 0x06,
        Esn = 0x07,
        Imeisv = 0x08,
        SearchMode = 0x09,
        BatteryState = 0x0A,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalInfo {
    Location(LocationInfo),
    Imei(Imei),
    NetworkMeasurement {
        results: Vec<u8>,
        bcch: Option<BcchChannelList>,
    },
    DateTime(DateTimeTimezone),
    Language(Language),
    TimingAdvance(TimingAdvance),
    AccessTechnology(u8),
    Esn(u32),
    Imeisv(Imeisv),
    SearchMode(u8),
    BatteryState(u8),
}

impl LocalInfo {
    pub fn kind(&self) -> LocalInfoKind {
        match self {
            LocalInfo::Location(_) => LocalInfoKind::Location,
            LocalInfo::Imei(_) => LocalInfoKind::Imei,
            LocalInfo::NetworkMeasurement { .. } => LocalInfoKind::NetworkMeasurement,
            LocalInfo::DateTime(_) => LocalInfoKind::DateTime,
            LocalInfo::Language(_) => LocalInfoKind::Language,
            LocalInfo::TimingAdvance(_) => LocalInfoKind::TimingAdvance,
            LocalInfo::AccessTechnology(_) => LocalInfoKind::AccessTechnology,
            LocalInfo::Esn(_) => LocalInfoKind::Esn,
            LocalInfo::Imeisv(_) => LocalInfoKind::Imeisv,
            LocalInfo::SearchMode(_) => LocalInfoKind::SearchMode,
            LocalInfo::BatteryState(_) => LocalInfoKind::BatteryState,
        }
    }

    pub(crate) fn encode(&self, builder: &mut TlvBuilder) -> Result<(), ObjectError> {
        match self {
            LocalInfo::Location(info) => builder.put(tags::LOCATION_INFO, true, info),
            LocalInfo::Imei(imei) => builder.put(tags::IMEI, true, imei),
            LocalInfo::NetworkMeasurement { results, bcch } => {
                builder.put(tags::NETWORK_MEASUREMENT_RESULTS, true, results)?;
                builder.put_opt(tags::BCCH_CHANNEL_LIST, true, bcch.as_ref())
            }
            LocalInfo::DateTime(datetime) => builder.put(tags::DATETIME_TIMEZONE, true, datetime),
            LocalInfo::Language(language) => builder.put(tags::LANGUAGE, true, language),
            LocalInfo::TimingAdvance(advance) => builder.put(tags::TIMING_ADVANCE, true, advance),
            LocalInfo::AccessTechnology(tech) => builder.put(tags::ACCESS_TECHNOLOGY, true, tech),
            LocalInfo::Esn(esn) => builder.put(tags::ESN, true, &esn.to_be_bytes().to_vec()),
            LocalInfo::Imeisv(imeisv) => builder.put(tags::IMEISV, true, imeisv),
            LocalInfo::SearchMode(mode) => builder.put(tags::NETWORK_SEARCH_MODE, true, mode),
            LocalInfo::BatteryState(state) => builder.put(tags::BATTERY_STATE, true, state),
        }
    }

    /// Objects expected for `kind`; unknown kinds expect nothing
    pub(crate) fn rules(kind: LocalInfoKind) -> &'static [Rule] {
        const LOCATION: &[Rule] = &[opt(tags::LOCATION_INFO)];
        const IMEI: &[Rule] = &[opt(tags::IMEI)];
        const NMR: &[Rule] = &[
            opt(tags::NETWORK_MEASUREMENT_RESULTS),
            opt(tags::BCCH_CHANNEL_LIST),
        ];
        const DATETIME: &[Rule] = &[opt(tags::DATETIME_TIMEZONE)];
        const LANGUAGE: &[Rule] = &[opt(tags::LANGUAGE)];
        const TIMING_ADVANCE: &[Rule] = &[opt(tags::TIMING_ADVANCE)];
        const ACCESS_TECHNOLOGY: &[Rule] = &[opt(tags::ACCESS_TECHNOLOGY)];
        const ESN: &[Rule] = &[opt(tags::ESN)];
        const IMEISV: &[Rule] = &[opt(tags::IMEISV)];
        const SEARCH_MODE: &[Rule] = &[opt(tags::NETWORK_SEARCH_MODE)];
        const BATTERY_STATE: &[Rule] = &[opt(tags::BATTERY_STATE)];

        match kind {
            LocalInfoKind::Location => LOCATION,
            LocalInfoKind::Imei => IMEI,
            LocalInfoKind::NetworkMeasurement => NMR,
            LocalInfoKind::DateTime => DATETIME,
            LocalInfoKind::Language => LANGUAGE,
            LocalInfoKind::TimingAdvance => TIMING_ADVANCE,
            LocalInfoKind::AccessTechnology => ACCESS_TECHNOLOGY,
            LocalInfoKind::Esn => ESN,
            LocalInfoKind::Imeisv => IMEISV,
            LocalInfoKind::SearchMode => SEARCH_MODE,
            LocalInfoKind::BatteryState => BATTERY_STATE,
            LocalInfoKind::Unknown(_) => &[],
        }
    }

    /// `None` when the response carries no information
    pub(crate) fn decode(kind: LocalInfoKind, o: &Objects<'_>) -> Result<Option<Self>, ParseError> {
        let info = match kind {
            LocalInfoKind::Location => o.decode(tags::LOCATION_INFO)?.map(LocalInfo::Location),
            LocalInfoKind::Imei => o.decode(tags::IMEI)?.map(LocalInfo::Imei),
            LocalInfoKind::NetworkMeasurement => match o.get(tags::NETWORK_MEASUREMENT_RESULTS) {
                Some(results) => Some(LocalInfo::NetworkMeasurement {
                    results: results.to_vec(),
                    bcch: o.decode(tags::BCCH_CHANNEL_LIST)?,
                }),
                None => None,
            },
            LocalInfoKind::DateTime => o.decode(tags::DATETIME_TIMEZONE)?.map(LocalInfo::DateTime),
            LocalInfoKind::Language => o.decode(tags::LANGUAGE)?.map(LocalInfo::Language),
            LocalInfoKind::TimingAdvance => {
                o.decode(tags::TIMING_ADVANCE)?.map(LocalInfo::TimingAdvance)
            }
            LocalInfoKind::AccessTechnology => {
                o.decode(tags::ACCESS_TECHNOLOGY)?.map(LocalInfo::AccessTechnology)
            }
            LocalInfoKind::Esn => match o.get(tags::ESN) {
                Some(value) => {
                    expect_len("ESN", value, 4)?;
                    Some(LocalInfo::Esn(u32::from_be_bytes([
                        value[0], value[1], value[2], value[3],
                    ])))
                }
                None => None,
            },
            LocalInfoKind::Imeisv => o.decode(tags::IMEISV)?.map(LocalInfo::Imeisv),
            LocalInfoKind::SearchMode => {
                o.decode(tags::NETWORK_SEARCH_MODE)?.map(LocalInfo::SearchMode)
            }
            LocalInfoKind::BatteryState => {
                o.decode(tags::BATTERY_STATE)?.map(LocalInfo::BatteryState)
            }
            LocalInfoKind::Unknown(_) => None,
        };
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::walker::walk;
    use crate::objects::CellId;

    #[test]
    fn test_kind_matches_qualifier() {
        assert_eq!(LocalInfoKind::from(0x03), LocalInfoKind::DateTime);
        assert_eq!(LocalInfo::Esn(1).kind(), LocalInfoKind::Esn);
        assert_eq!(u8::from(LocalInfo::BatteryState(2).kind()), 0x0A);
    }

    #[test]
    fn test_encode_location() {
        let info = LocalInfo::Location(LocationInfo {
            mcc: "234".to_string(),
            mnc: "15".to_string(),
            lac: 0x0001,
            cell_id: Some(CellId::Gsm(0x0002)),
        });
        let mut builder = TlvBuilder::new();
        info.encode(&mut builder).unwrap();
        assert_eq!(builder.build(), hex::decode("930732F45100010002").unwrap());
    }

    #[test]
    fn test_encode_nmr_with_bcch() {
        let info = LocalInfo::NetworkMeasurement {
            results: vec![0x80, 0x17, 0x17],
            bcch: Some(BcchChannelList(vec![1, 2, 3])),
        };
        let mut builder = TlvBuilder::new();
        info.encode(&mut builder).unwrap();
        assert_eq!(builder.build(), hex::decode("96038017179D040040200C").unwrap());
    }

    #[test]
    fn test_encode_esn() {
        let mut builder = TlvBuilder::new();
        LocalInfo::Esn(0x12345678).encode(&mut builder).unwrap();
        assert_eq!(builder.build(), hex::decode("C60412345678").unwrap());
    }

    #[test]
    fn test_decode_esn_and_missing() {
        let body = hex::decode("C60412345678").unwrap();
        let objects = walk(&body, LocalInfo::rules(LocalInfoKind::Esn), false, false).unwrap();
        assert_eq!(
            LocalInfo::decode(LocalInfoKind::Esn, &objects).unwrap(),
            Some(LocalInfo::Esn(0x12345678))
        );

        let objects = walk(&[], LocalInfo::rules(LocalInfoKind::Imei), false, false).unwrap();
        assert_eq!(LocalInfo::decode(LocalInfoKind::Imei, &objects).unwrap(), None);
    }

    #[test]
    fn test_decode_short_esn() {
        let body = hex::decode("C603123456").unwrap();
        let objects = walk(&body, LocalInfo::rules(LocalInfoKind::Esn), false, false).unwrap();
        assert_eq!(
            LocalInfo::decode(LocalInfoKind::Esn, &objects),
            Err(ParseError::DataNotUnderstood)
        );
    }
}
