//! Bearer Independent Protocol objects (TS 102.223 §8.52-8.61)

use std::net::{Ipv4Addr, Ipv6Addr};

use super::{expect_len, DataObject, ObjectError};

const BEARER_GPRS: u8 = 0x02;
const BEARER_DEFAULT: u8 = 0x03;

/// GPRS / UTRAN packet service bearer parameters (§8.52.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GprsBearer {
    pub precedence: u8,
    pub delay: u8,
    pub reliability: u8,
    pub peak: u8,
    pub mean: u8,
    pub pdp_type: u8,
}

/// Bearer description, discriminated by the bearer type byte
///
/// Bearer kinds without a dedicated variant keep their type byte and raw
/// parameters so they pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BearerDescription {
    Gprs(GprsBearer),
    Default,
    Other { bearer_type: u8, parameters: Vec<u8> },
}

impl BearerDescription {
    pub fn bearer_type(&self) -> u8 {
        match self {
            BearerDescription::Gprs(_) => BEARER_GPRS,
            BearerDescription::Default => BEARER_DEFAULT,
            BearerDescription::Other { bearer_type, .. } => *bearer_type,
        }
    }
}

impl DataObject for BearerDescription {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        let (&bearer_type, params) = value.split_first().ok_or(ObjectError::InvalidLength {
            object: "bearer description",
            length: 0,
        })?;

        match bearer_type {
            BEARER_GPRS => {
                expect_len("GPRS bearer parameters", params, 6)?;
                Ok(BearerDescription::Gprs(GprsBearer {
                    precedence: params[0],
                    delay: params[1],
                    reliability: params[2],
                    peak: params[3],
                    mean: params[4],
                    pdp_type: params[5],
                }))
            }
            BEARER_DEFAULT if params.is_empty() => Ok(BearerDescription::Default),
            _ => Ok(BearerDescription::Other {
                bearer_type,
                parameters: params.to_vec(),
            }),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.push(self.bearer_type());
        match self {
            BearerDescription::Gprs(g) => out.extend_from_slice(&[
                g.precedence,
                g.delay,
                g.reliability,
                g.peak,
                g.mean,
                g.pdp_type,
            ]),
            BearerDescription::Default => {}
            BearerDescription::Other { parameters, .. } => out.extend_from_slice(parameters),
        }
        Ok(())
    }
}

const ADDRESS_IPV4: u8 = 0x21;
const ADDRESS_IPV6: u8 = 0x57;

/// Other address (§8.58)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherAddress {
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    /// Type byte only: the terminal allocates an address of that type
    Dynamic(u8),
}

impl DataObject for OtherAddress {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        let (&kind, addr) = value.split_first().ok_or(ObjectError::InvalidLength {
            object: "other address",
            length: 0,
        })?;

        if addr.is_empty() {
            return Ok(OtherAddress::Dynamic(kind));
        }

        match kind {
            ADDRESS_IPV4 => {
                let octets: [u8; 4] = addr.try_into().map_err(|_| ObjectError::InvalidLength {
                    object: "IPv4 address",
                    length: addr.len(),
                })?;
                Ok(OtherAddress::Ipv4(Ipv4Addr::from(octets)))
            }
            ADDRESS_IPV6 => {
                let octets: [u8; 16] = addr.try_into().map_err(|_| ObjectError::InvalidLength {
                    object: "IPv6 address",
                    length: addr.len(),
                })?;
                Ok(OtherAddress::Ipv6(Ipv6Addr::from(octets)))
            }
            value => Err(ObjectError::InvalidValue {
                object: "other address type",
                value,
            }),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        match self {
            OtherAddress::Ipv4(addr) => {
                out.push(ADDRESS_IPV4);
                out.extend_from_slice(&addr.octets());
            }
            OtherAddress::Ipv6(addr) => {
                out.push(ADDRESS_IPV6);
                out.extend_from_slice(&addr.octets());
            }
            OtherAddress::Dynamic(kind) => out.push(*kind),
        }
        Ok(())
    }
}

byte_enum! {
    /// Transport protocol type (§8.59)
    pub enum TransportProtocol {
        UdpClientRemote = 0x01,
        TcpClientRemote = 0x02,
        TcpServer = 0x03,
        UdpClientLocal = 0x04,
        TcpClientLocal = 0x05,
        Direct = 0x06,
    }
}

byte_object!(TransportProtocol, "transport protocol");

/// UICC/terminal interface transport level: protocol and port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportLevel {
    pub protocol: TransportProtocol,
    pub port: u16,
}

impl DataObject for TransportLevel {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("transport level", value, 3)?;
        Ok(Self {
            protocol: value[0].into(),
            port: u16::from_be_bytes([value[1], value[2]]),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.push(self.protocol.into());
        out.extend_from_slice(&self.port.to_be_bytes());
        Ok(())
    }
}

/// State of one BIP channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    NotActivated,
    Activated,
    LinkDropped,
}

/// Channel status (§8.56)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStatus {
    pub channel_id: u8,
    pub state: ChannelState,
}

const LINK_ESTABLISHED: u8 = 0x80;
const FURTHER_INFO_LINK_DROPPED: u8 = 0x05;

impl DataObject for ChannelStatus {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("channel status", value, 2)?;
        let state = if value[0] & LINK_ESTABLISHED != 0 {
            ChannelState::Activated
        } else if value[1] == FURTHER_INFO_LINK_DROPPED {
            ChannelState::LinkDropped
        } else {
            ChannelState::NotActivated
        };
        Ok(Self {
            channel_id: value[0] & 0x07,
            state,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        if self.channel_id > 0x07 {
            return Err(ObjectError::InvalidValue {
                object: "channel identifier",
                value: self.channel_id,
            });
        }
        let (flag, info) = match self.state {
            ChannelState::Activated => (LINK_ESTABLISHED, 0x00),
            ChannelState::NotActivated => (0x00, 0x00),
            ChannelState::LinkDropped => (0x00, FURTHER_INFO_LINK_DROPPED),
        };
        out.extend_from_slice(&[self.channel_id | flag, info]);
        Ok(())
    }
}

/// Network access name (§8.61), held in dotted form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkAccessName(pub String);

impl DataObject for NetworkAccessName {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        let mut labels = Vec::new();
        let mut rest = value;
        while let Some((&len, tail)) = rest.split_first() {
            let len = len as usize;
            if len == 0 || len > tail.len() {
                return Err(ObjectError::InvalidLength {
                    object: "network access name label",
                    length: len,
                });
            }
            labels.push(String::from_utf8_lossy(&tail[..len]).into_owned());
            rest = &tail[len..];
        }
        Ok(Self(labels.join(".")))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        for label in self.0.split('.') {
            if label.is_empty() || label.len() > 63 {
                return Err(ObjectError::InvalidLength {
                    object: "network access name label",
                    length: label.len(),
                });
            }
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gprs_bearer() {
        let value = hex::decode("02030402041F02").unwrap();
        let bearer = BearerDescription::decode(&value).unwrap();
        assert_eq!(
            bearer,
            BearerDescription::Gprs(GprsBearer {
                precedence: 0x03,
                delay: 0x04,
                reliability: 0x02,
                peak: 0x04,
                mean: 0x1F,
                pdp_type: 0x02,
            })
        );
        assert_eq!(bearer.to_value().unwrap(), value);
        assert!(BearerDescription::decode(&[0x02, 0x03]).is_err());
    }

    #[test]
    fn test_other_bearers_pass_through() {
        assert_eq!(BearerDescription::decode(&[0x03]).unwrap(), BearerDescription::Default);
        let value = hex::decode("0B0102").unwrap();
        let bearer = BearerDescription::decode(&value).unwrap();
        assert_eq!(bearer.bearer_type(), 0x0B);
        assert_eq!(bearer.to_value().unwrap(), value);
    }

    #[test]
    fn test_other_address() {
        let value = hex::decode("2101010101").unwrap();
        let addr = OtherAddress::decode(&value).unwrap();
        assert_eq!(addr, OtherAddress::Ipv4(Ipv4Addr::new(1, 1, 1, 1)));
        assert_eq!(addr.to_value().unwrap(), value);

        let mut v6 = vec![0x57];
        v6.extend(Ipv6Addr::LOCALHOST.octets());
        assert_eq!(OtherAddress::decode(&v6).unwrap(), OtherAddress::Ipv6(Ipv6Addr::LOCALHOST));

        assert_eq!(OtherAddress::decode(&[0x21]).unwrap(), OtherAddress::Dynamic(0x21));
        assert!(OtherAddress::decode(&[0x21, 0x01]).is_err());
        assert!(OtherAddress::decode(&[0x30, 0x01]).is_err());
    }

    #[test]
    fn test_transport_level() {
        let value = hex::decode("021234").unwrap();
        let level = TransportLevel::decode(&value).unwrap();
        assert_eq!(level.protocol, TransportProtocol::TcpClientRemote);
        assert_eq!(level.port, 0x1234);
        assert_eq!(level.to_value().unwrap(), value);
    }

    #[test]
    fn test_channel_status() {
        let status = ChannelStatus::decode(&[0x81, 0x00]).unwrap();
        assert_eq!(status, ChannelStatus { channel_id: 1, state: ChannelState::Activated });
        assert_eq!(status.to_value().unwrap(), vec![0x81, 0x00]);

        let dropped = ChannelStatus::decode(&[0x01, 0x05]).unwrap();
        assert_eq!(dropped.state, ChannelState::LinkDropped);
        assert_eq!(dropped.to_value().unwrap(), vec![0x01, 0x05]);

        let idle = ChannelStatus { channel_id: 2, state: ChannelState::NotActivated };
        assert_eq!(idle.to_value().unwrap(), vec![0x02, 0x00]);
    }

    #[test]
    fn test_network_access_name() {
        let value = hex::decode("06546573744770027273").unwrap();
        let apn = NetworkAccessName::decode(&value).unwrap();
        assert_eq!(apn.0, "TestGp.rs");
        assert_eq!(apn.to_value().unwrap(), value);
    }

    #[test]
    fn test_network_access_name_invalid() {
        assert!(NetworkAccessName::decode(&hex::decode("05546573").unwrap()).is_err());
        assert!(NetworkAccessName::decode(&[0x00]).is_err());
        assert!(NetworkAccessName("a..b".to_string()).to_value().is_err());
    }
}
