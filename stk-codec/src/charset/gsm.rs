//! GSM 03.38 default alphabet and 7-bit packing
//!
//! 3GPP TS 23.038 §6.2.1 (default alphabet, extension table) and §6.1.2.1
//! (septet packing).

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::CharsetError;

/// Escape to the extension table
pub const ESCAPE: u8 = 0x1B;

/// Carriage return, also the 7-bit fill character
const CR: u8 = 0x0D;

/// The default alphabet, indexed by septet value
const DEFAULT_ALPHABET: [char; 128] = [
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å',
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', '\u{A0}', 'Æ', 'æ', 'ß', 'É',
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?',
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§',
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à',
];

/// The extension table (entries reached through ESCAPE)
const EXTENSION: [(u8, char); 10] = [
    (0x0A, '\u{0C}'),
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x65, '€'),
];

/// Reverse lookup: character to (escaped, septet)
static REVERSE: Lazy<HashMap<char, (bool, u8)>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(DEFAULT_ALPHABET.len() + EXTENSION.len());
    for (code, &c) in DEFAULT_ALPHABET.iter().enumerate() {
        if code as u8 != ESCAPE {
            map.insert(c, (false, code as u8));
        }
    }
    for &(code, c) in EXTENSION.iter() {
        map.insert(c, (true, code));
    }
    map
});

fn extension_char(code: u8) -> Option<char> {
    EXTENSION.iter().find(|(c, _)| *c == code).map(|(_, ch)| *ch)
}

/// Decode one default-alphabet character, without escape handling
pub fn default_char(code: u8) -> Result<char, CharsetError> {
    DEFAULT_ALPHABET
        .get(code as usize)
        .copied()
        .ok_or(CharsetError::InvalidGsm(code))
}

/// Convert unpacked septets to a string
///
/// An escape followed by a code with no extension entry decodes as the
/// default-alphabet character for that code. A trailing escape is dropped.
pub fn gsm_to_string(septets: &[u8]) -> Result<String, CharsetError> {
    let mut out = String::with_capacity(septets.len());
    let mut iter = septets.iter().copied();

    while let Some(code) = iter.next() {
        if code == ESCAPE {
            match iter.next() {
                Some(next) => match extension_char(next) {
                    Some(c) => out.push(c),
                    None => out.push(default_char(next)?),
                },
                None => break,
            }
            continue;
        }
        out.push(default_char(code)?);
    }

    Ok(out)
}

/// Convert a string to unpacked septets
pub fn string_to_gsm(text: &str) -> Result<Vec<u8>, CharsetError> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match REVERSE.get(&c) {
            Some(&(false, code)) => out.push(code),
            Some(&(true, code)) => {
                out.push(ESCAPE);
                out.push(code);
            }
            None => return Err(CharsetError::Unencodable(c)),
        }
    }
    Ok(out)
}

/// Check whether every character has a GSM encoding
pub fn is_gsm_representable(text: &str) -> bool {
    text.chars().all(|c| REVERSE.contains_key(&c))
}

/// Unpack `count` septets from packed 7-bit data
pub fn unpack_7bit(data: &[u8], count: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let bit = i * 7;
        let byte = bit / 8;
        let shift = bit % 8;
        if byte >= data.len() {
            break;
        }
        let mut value = (data[byte] >> shift) as u16;
        if shift > 1 {
            if let Some(&next) = data.get(byte + 1) {
                value |= (next as u16) << (8 - shift);
            }
        }
        out.push((value & 0x7F) as u8);
    }
    out
}

/// Pack septets into 7-bit data
///
/// Seven spare bits at the end are filled with CR. A text that itself ends
/// in CR on an octet boundary gets a second CR, so the last CR is never read
/// back as fill.
pub fn pack_7bit(septets: &[u8]) -> Vec<u8> {
    let mut septets = septets.to_vec();
    match septets.len() % 8 {
        7 => septets.push(CR),
        0 if septets.last() == Some(&CR) => septets.push(CR),
        _ => {}
    }

    let mut out = vec![0u8; (septets.len() * 7 + 7) / 8];
    for (i, &septet) in septets.iter().enumerate() {
        let septet = septet & 0x7F;
        let bit = i * 7;
        let byte = bit / 8;
        let shift = bit % 8;
        out[byte] |= septet << shift;
        if shift > 1 {
            out[byte + 1] |= septet >> (8 - shift);
        }
    }
    out
}

/// Unpack a whole packed buffer
///
/// The septet count is derived from the byte length. When the data ends on
/// a septet boundary a final CR is fill. When one spare bit remains a final
/// CR CR pair carries one added CR; the two read the same as one CR.
pub fn unpack_all(data: &[u8]) -> Vec<u8> {
    let count = data.len() * 8 / 7;
    let mut septets = unpack_7bit(data, count);
    match count % 8 {
        0 if septets.last() == Some(&CR) => {
            septets.pop();
        }
        1 if septets.ends_with(&[CR, CR]) => {
            septets.pop();
        }
        _ => {}
    }
    septets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_known_vector() {
        let septets = string_to_gsm("hellohello").unwrap();
        assert_eq!(pack_7bit(&septets), hex::decode("E8329BFD4697D9EC37").unwrap());
    }

    #[test]
    fn test_unpack_known_vector() {
        let data = hex::decode("E8329BFD4697D9EC37").unwrap();
        let septets = unpack_all(&data);
        assert_eq!(gsm_to_string(&septets).unwrap(), "hellohello");
    }

    #[test]
    fn test_unpack_drops_fill_septet() {
        // Seven characters leave seven spare bits, filled with CR
        let septets = string_to_gsm("Toolkit").unwrap();
        let packed = pack_7bit(&septets);
        assert_eq!(packed.len(), 7);
        assert_eq!(packed[6] >> 1, 0x0D);
        assert_eq!(gsm_to_string(&unpack_all(&packed)).unwrap(), "Toolkit");
    }

    #[test]
    fn test_trailing_at_sign_kept() {
        for text in ["1234567@", "123456@"] {
            let packed = pack_7bit(&string_to_gsm(text).unwrap());
            assert_eq!(packed.len(), 7);
            assert_eq!(gsm_to_string(&unpack_all(&packed)).unwrap(), text);
        }
        // Zero padding from other encoders decodes as a real '@'
        let zero_padded = hex::decode("31D98C56B3DD00").unwrap();
        assert_eq!(gsm_to_string(&unpack_all(&zero_padded)).unwrap(), "1234567@");
    }

    #[test]
    fn test_trailing_carriage_return() {
        let packed = pack_7bit(&string_to_gsm("123456\r").unwrap());
        assert_eq!(packed.len(), 7);
        assert_eq!(gsm_to_string(&unpack_all(&packed)).unwrap(), "123456\r");

        // A CR on the octet boundary is doubled
        let packed = pack_7bit(&string_to_gsm("1234567\r").unwrap());
        assert_eq!(packed.len(), 8);
        assert_eq!(unpack_7bit(&packed, 9)[7..], [0x0D, 0x0D]);
        assert_eq!(gsm_to_string(&unpack_all(&packed)).unwrap(), "1234567\r");
    }

    #[test]
    fn test_extension_table() {
        let septets = string_to_gsm("{€}").unwrap();
        assert_eq!(septets, vec![0x1B, 0x28, 0x1B, 0x65, 0x1B, 0x29]);
        assert_eq!(gsm_to_string(&septets).unwrap(), "{€}");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(gsm_to_string(&[0x1B, 0x41]).unwrap(), "A");
        assert_eq!(gsm_to_string(&[0x41, 0x1B]).unwrap(), "A");
    }

    #[test]
    fn test_national_characters() {
        assert_eq!(gsm_to_string(&[0x00, 0x01, 0x10, 0x7F]).unwrap(), "@£Δà");
        assert_eq!(string_to_gsm("Ωß").unwrap(), vec![0x15, 0x1E]);
    }

    #[test]
    fn test_unencodable() {
        assert_eq!(string_to_gsm("ЗДРАВСТВУЙТЕ"), Err(CharsetError::Unencodable('З')));
        assert!(!is_gsm_representable("中"));
        assert!(is_gsm_representable("Enter \"+\""));
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(gsm_to_string(&[0x80]), Err(CharsetError::InvalidGsm(0x80)));
    }
}
