//! Time objects: duration, timer value, date-time and time zone
//!
//! Timer values and date-time fields use swapped-nibble BCD: the low
//! nibble holds the tens digit, the high nibble the units digit.

use super::{expect_len, DataObject, ObjectError};

/// Decode one swapped-nibble BCD byte
fn from_swapped_bcd(object: &'static str, byte: u8) -> Result<u8, ObjectError> {
    let tens = byte & 0x0F;
    let units = byte >> 4;
    if tens > 9 || units > 9 {
        return Err(ObjectError::InvalidValue { object, value: byte });
    }
    Ok(tens * 10 + units)
}

fn to_swapped_bcd(object: &'static str, value: u8) -> Result<u8, ObjectError> {
    if value > 99 {
        return Err(ObjectError::InvalidValue { object, value });
    }
    Ok((value / 10) | ((value % 10) << 4))
}

/// Duration unit (TS 102.223 §8.8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Minutes,
    Seconds,
    TenthsOfSeconds,
}

impl TryFrom<u8> for TimeUnit {
    type Error = ObjectError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x00 => Ok(TimeUnit::Minutes),
            0x01 => Ok(TimeUnit::Seconds),
            0x02 => Ok(TimeUnit::TenthsOfSeconds),
            value => Err(ObjectError::InvalidValue {
                object: "time unit",
                value,
            }),
        }
    }
}

impl From<TimeUnit> for u8 {
    fn from(unit: TimeUnit) -> u8 {
        match unit {
            TimeUnit::Minutes => 0x00,
            TimeUnit::Seconds => 0x01,
            TimeUnit::TenthsOfSeconds => 0x02,
        }
    }
}

/// Duration: a unit and an interval count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Duration {
    pub unit: TimeUnit,
    pub interval: u8,
}

impl Duration {
    pub fn seconds(interval: u8) -> Self {
        Self {
            unit: TimeUnit::Seconds,
            interval,
        }
    }

    pub fn to_std(&self) -> std::time::Duration {
        let interval = self.interval as u64;
        match self.unit {
            TimeUnit::Minutes => std::time::Duration::from_secs(interval * 60),
            TimeUnit::Seconds => std::time::Duration::from_secs(interval),
            TimeUnit::TenthsOfSeconds => std::time::Duration::from_millis(interval * 100),
        }
    }
}

impl DataObject for Duration {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("duration", value, 2)?;
        Ok(Self {
            unit: TimeUnit::try_from(value[0])?,
            interval: value[1],
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        out.extend_from_slice(&[self.unit.into(), self.interval]);
        Ok(())
    }
}

/// Timer value (§8.38)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TimerValue {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimerValue {
    pub fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    pub fn to_std(&self) -> std::time::Duration {
        let secs = self.hour as u64 * 3600 + self.minute as u64 * 60 + self.second as u64;
        std::time::Duration::from_secs(secs)
    }
}

impl DataObject for TimerValue {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        expect_len("timer value", value, 3)?;
        Ok(Self {
            hour: from_swapped_bcd("timer value", value[0])?,
            minute: from_swapped_bcd("timer value", value[1])?,
            second: from_swapped_bcd("timer value", value[2])?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        if self.minute > 59 || self.second > 59 {
            return Err(ObjectError::InvalidValue {
                object: "timer value",
                value: self.minute.max(self.second),
            });
        }
        out.push(to_swapped_bcd("timer value", self.hour)?);
        out.push(to_swapped_bcd("timer value", self.minute)?);
        out.push(to_swapped_bcd("timer value", self.second)?);
        Ok(())
    }
}

/// Date-time and time zone (§8.39), as in the SMS service centre time stamp
///
/// `timezone` is in quarters of an hour; None when the terminal reports
/// the time zone as unknown (0xFF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTimeTimezone {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub timezone: Option<i8>,
}

impl DataObject for DateTimeTimezone {
    fn decode(value: &[u8]) -> Result<Self, ObjectError> {
        const NAME: &str = "date-time and time zone";
        expect_len(NAME, value, 7)?;

        let timezone = match value[6] {
            0xFF => None,
            byte => {
                let quarters = from_swapped_bcd(NAME, byte & !0x08)? as i8;
                Some(if byte & 0x08 != 0 { -quarters } else { quarters })
            }
        };

        Ok(Self {
            year: from_swapped_bcd(NAME, value[0])?,
            month: from_swapped_bcd(NAME, value[1])?,
            day: from_swapped_bcd(NAME, value[2])?,
            hour: from_swapped_bcd(NAME, value[3])?,
            minute: from_swapped_bcd(NAME, value[4])?,
            second: from_swapped_bcd(NAME, value[5])?,
            timezone,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), ObjectError> {
        const NAME: &str = "date-time and time zone";
        for field in [self.year, self.month, self.day, self.hour, self.minute, self.second] {
            out.push(to_swapped_bcd(NAME, field)?);
        }
        match self.timezone {
            None => out.push(0xFF),
            Some(quarters) => {
                let byte = to_swapped_bcd(NAME, quarters.unsigned_abs())?;
                out.push(if quarters < 0 { byte | 0x08 } else { byte });
            }
        }
        Ok(())
    }
}
