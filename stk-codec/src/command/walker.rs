//! Ordered object matching
//!
//! Each command declares the objects it accepts as a list of [`Rule`]s in
//! the order the standard defines. The walker assigns every object of the
//! command body to the first pending rule with the same tag, never skipping
//! past a mandatory rule, and records which rules were satisfied.

use log::{debug, warn};

use super::ParseError;
use crate::objects::{decode_alpha_id, decode_text_string, DataObject};
use crate::tlv::{ComprehensionTlv, TlvReader};

/// One expected object in a command's grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rule {
    pub tag: u16,
    pub mandatory: bool,
    /// Present with zero length counts as missing
    pub non_empty: bool,
    /// Absorbs consecutive objects with the same tag
    pub repeat: bool,
}

pub(crate) const fn opt(tag: u16) -> Rule {
    Rule {
        tag,
        mandatory: false,
        non_empty: false,
        repeat: false,
    }
}

/// Mandatory, may be empty
pub(crate) const fn req(tag: u16) -> Rule {
    Rule {
        tag,
        mandatory: true,
        non_empty: false,
        repeat: false,
    }
}

/// Mandatory and must carry data
pub(crate) const fn val(tag: u16) -> Rule {
    Rule {
        tag,
        mandatory: true,
        non_empty: true,
        repeat: false,
    }
}

pub(crate) const fn many(rule: Rule) -> Rule {
    Rule {
        repeat: true,
        ..rule
    }
}

/// Objects of a command body sorted into rule slots
#[derive(Debug)]
pub(crate) struct Objects<'a> {
    rules: &'static [Rule],
    slots: Vec<Vec<ComprehensionTlv<'a>>>,
}

/// Match the objects in `body` against `rules`
///
/// Framing errors abort the walk. Otherwise a missing mandatory object
/// wins over an unexpected comprehension-required one.
pub(crate) fn walk<'a>(
    body: &'a [u8],
    rules: &'static [Rule],
    strict: bool,
    ignore_unknown_cr: bool,
) -> Result<Objects<'a>, ParseError> {
    let mut slots: Vec<Vec<ComprehensionTlv<'a>>> = vec![Vec::new(); rules.len()];
    let mut next = 0;
    let mut last: Option<usize> = None;
    let mut unexpected = false;

    for tlv in TlvReader::new(body).strict(strict) {
        let tlv = tlv?;

        if let Some(i) = last {
            if rules[i].repeat && rules[i].tag == tlv.tag {
                slots[i].push(tlv);
                continue;
            }
        }

        let mut matched = None;
        for (i, rule) in rules.iter().enumerate().skip(next) {
            if rule.tag == tlv.tag {
                matched = Some(i);
                break;
            }
            if rule.mandatory {
                break;
            }
        }

        match matched {
            Some(i) => {
                slots[i].push(tlv);
                next = i + 1;
                last = Some(i);
            }
            None if tlv.cr && !ignore_unknown_cr => {
                warn!("Unexpected comprehension-required object 0x{:02X}", tlv.tag);
                unexpected = true;
                last = None;
            }
            None => {
                debug!("Skipping object 0x{:02X} ({} bytes)", tlv.tag, tlv.len());
                last = None;
            }
        }
    }

    for (rule, slot) in rules.iter().zip(&slots) {
        if !rule.mandatory {
            continue;
        }
        let missing = match slot.first() {
            None => true,
            Some(tlv) => rule.non_empty && tlv.is_empty(),
        };
        if missing {
            debug!("Mandatory object 0x{:02X} missing", rule.tag);
            return Err(ParseError::MissingValue);
        }
    }

    if unexpected {
        return Err(ParseError::DataNotUnderstood);
    }

    Ok(Objects { rules, slots })
}

impl<'a> Objects<'a> {
    fn slot(&self, tag: u16, nth: usize) -> &[ComprehensionTlv<'a>] {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.tag == tag)
            .nth(nth)
            .map(|(i, _)| self.slots[i].as_slice())
            .unwrap_or(&[])
    }

    /// Value of the `nth` rule with `tag`
    pub fn nth(&self, tag: u16, nth: usize) -> Option<&'a [u8]> {
        self.slot(tag, nth).first().map(|tlv| tlv.value)
    }

    pub fn get(&self, tag: u16) -> Option<&'a [u8]> {
        self.nth(tag, 0)
    }

    pub fn has(&self, tag: u16) -> bool {
        self.get(tag).is_some()
    }

    /// No rule matched anything
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }

    /// Every value collected by a repeating rule
    pub fn all(&self, tag: u16) -> Vec<&'a [u8]> {
        self.slot(tag, 0).iter().map(|tlv| tlv.value).collect()
    }

    pub fn decode_nth<T: DataObject>(&self, tag: u16, nth: usize) -> Result<Option<T>, ParseError> {
        match self.nth(tag, nth) {
            Some(value) => Ok(Some(T::decode(value)?)),
            None => Ok(None),
        }
    }

    pub fn decode<T: DataObject>(&self, tag: u16) -> Result<Option<T>, ParseError> {
        self.decode_nth(tag, 0)
    }

    /// Decode an object the walker has already checked for
    pub fn require<T: DataObject>(&self, tag: u16) -> Result<T, ParseError> {
        self.decode(tag)?.ok_or(ParseError::MissingValue)
    }

    pub fn alpha_nth(&self, tag: u16, nth: usize) -> Result<Option<String>, ParseError> {
        match self.nth(tag, nth) {
            Some(value) => Ok(Some(decode_alpha_id(value)?)),
            None => Ok(None),
        }
    }

    pub fn alpha(&self, tag: u16) -> Result<Option<String>, ParseError> {
        self.alpha_nth(tag, 0)
    }

    pub fn text_nth(&self, tag: u16, nth: usize) -> Result<Option<String>, ParseError> {
        match self.nth(tag, nth) {
            Some(value) => Ok(Some(decode_text_string(value)?)),
            None => Ok(None),
        }
    }

    pub fn text(&self, tag: u16) -> Result<Option<String>, ParseError> {
        self.text_nth(tag, 0)
    }
}
