//! String escaping, escape decoding, and number grammar checks shared by the
//! tokenizer, the binding engine, and the serializers.

use alloc::string::String;

use crate::error::Error;

/// Writes `s` with all characters that JSON requires to be escaped replaced
/// by their escape sequences.
pub(crate) fn write_escaped_string<W: core::fmt::Write + ?Sized>(
    s: &str,
    f: &mut W,
) -> Result<(), core::fmt::Error> {
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\u{8}' => f.write_str("\\b")?,
            '\u{c}' => f.write_str("\\f")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Decodes the raw text between string quotes, resolving escape sequences
/// (including `\uXXXX` and surrogate pairs), and appends the result to `out`.
pub(crate) fn unescape_into(raw: &str, out: &mut String) -> Result<(), Error> {
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let unit = hex4(&mut chars)?;
                let code = if (0xD800..=0xDBFF).contains(&unit) {
                    // High surrogate: the low half must follow immediately.
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(Error::EncounteredIllegalChar);
                    }
                    let low = hex4(&mut chars)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(Error::EncounteredIllegalChar);
                    }
                    0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    unit
                };
                let decoded = char::from_u32(code).ok_or(Error::EncounteredIllegalChar)?;
                out.push(decoded);
            }
            _ => return Err(Error::EncounteredIllegalChar),
        }
    }
    Ok(())
}

fn hex4(chars: &mut core::str::Chars<'_>) -> Result<u32, Error> {
    let mut code = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or(Error::EncounteredIllegalChar)?;
        code = code * 16 + digit;
    }
    Ok(code)
}

/// Checks `s` against the JSON number grammar:
/// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
pub(crate) fn is_valid_number(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    if b.first() == Some(&b'-') {
        i += 1;
    }
    match b.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while matches!(b.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        _ => return false,
    }
    if b.get(i) == Some(&b'.') {
        i += 1;
        if !matches!(b.get(i), Some(b'0'..=b'9')) {
            return false;
        }
        while matches!(b.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if !matches!(b.get(i), Some(b'0'..=b'9')) {
            return false;
        }
        while matches!(b.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
    }
    i == b.len()
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{is_valid_number, unescape_into, write_escaped_string};

    #[test]
    fn number_grammar() {
        for good in ["0", "-0", "45", "-45", "4.5", "0.25", "1e3", "6.02e-23", "9E+2"] {
            assert!(is_valid_number(good), "{good} should be valid");
        }
        for bad in ["", "-", "+1", "01", "4.", ".5", "1e", "1e+", "4..5", "4-5", "45x"] {
            assert!(!is_valid_number(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn unescape_basic_and_unicode() {
        let mut out = String::new();
        unescape_into(r#"a\"b\\c\ndA😀"#, &mut out).unwrap();
        assert_eq!(out, "a\"b\\c\ndA\u{1F600}");
    }

    #[test]
    fn unescape_rejects_lone_surrogate() {
        let mut out = String::new();
        assert!(unescape_into(r"\uD800x", &mut out).is_err());
    }

    #[test]
    fn escape_round_trips() {
        let original = "line\nbreak \"quoted\" back\\slash \u{1}";
        let mut escaped = String::new();
        write_escaped_string(original, &mut escaped).unwrap();
        let mut decoded = String::new();
        unescape_into(&escaped, &mut decoded).unwrap();
        assert_eq!(decoded, original);
    }
}
