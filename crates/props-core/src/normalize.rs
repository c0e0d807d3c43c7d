//! Key normalization: space escaping and `\uXXXX` decoding.
//!
//! Keys are stored with every literal space escaped as `\ ` so that two
//! spellings of the same key collapse to one table entry. Unicode escapes are
//! only decoded on demand (for display, lookups and the `utf8` clean option).

use std::borrow::Cow;

/// Escape every literal space that is not already preceded by a backslash.
///
/// Existing `\ ` sequences are left alone, which makes the function
/// idempotent.
///
/// ```
/// use props_core::escape_spaces;
///
/// assert_eq!(escape_spaces("my key"), "my\\ key");
/// assert_eq!(escape_spaces("my\\ key"), "my\\ key");
/// ```
pub fn escape_spaces(input: &str) -> Cow<'_, str> {
    if !input.contains(' ') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 4);
    let mut prev = None;
    for ch in input.chars() {
        if ch == ' ' && prev != Some('\\') {
            out.push_str("\\ ");
        } else {
            out.push(ch);
        }
        prev = Some(ch);
    }
    Cow::Owned(out)
}

/// Turn `\ ` back into a plain space.
pub fn unescape_spaces(input: &str) -> Cow<'_, str> {
    if input.contains("\\ ") {
        Cow::Owned(input.replace("\\ ", " "))
    } else {
        Cow::Borrowed(input)
    }
}

/// Replace every `\uHHHH` escape with the character it encodes.
///
/// Input without any `\u` substring is returned borrowed and untouched.
/// A high surrogate immediately followed by a low surrogate escape is
/// combined into one character; a lone surrogate cannot be represented and is
/// kept in its escaped form.
///
/// ```
/// use props_core::decode_unicode;
///
/// assert_eq!(decode_unicode("a\\u0041b"), "aAb");
/// ```
pub fn decode_unicode(input: &str) -> Cow<'_, str> {
    if !input.contains("\\u") {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        let Some(unit) = escape_at(bytes, i) else {
            i += 1;
            continue;
        };

        let (decoded, consumed) = match unit {
            0xD800..=0xDBFF => match escape_at(bytes, i + 6) {
                Some(low @ 0xDC00..=0xDFFF) => {
                    let code = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    (char::from_u32(code), 12)
                }
                _ => (None, 6),
            },
            _ => (char::from_u32(u32::from(unit)), 6),
        };

        if let Some(ch) = decoded {
            out.push_str(&input[copied..i]);
            out.push(ch);
            copied = i + consumed;
        }
        i += consumed;
    }

    out.push_str(&input[copied..]);
    Cow::Owned(out)
}

/// Human-readable form of a stored key: spaces unescaped, unicode decoded.
pub fn display_key(key: &str) -> String {
    decode_unicode(&unescape_spaces(key)).into_owned()
}

/// Parse a `\uHHHH` escape starting at `at`, returning the UTF-16 code unit.
fn escape_at(bytes: &[u8], at: usize) -> Option<u16> {
    let escape = bytes.get(at..at + 6)?;
    if escape[0] != b'\\' || escape[1] != b'u' {
        return None;
    }
    let hex = std::str::from_utf8(&escape[2..]).ok()?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn escapes_bare_spaces() {
        assert_eq!(escape_spaces("a b c"), "a\\ b\\ c");
        assert_eq!(escape_spaces(" lead"), "\\ lead");
        assert_eq!(escape_spaces("two  spaces"), "two\\ \\ spaces");
    }

    #[test]
    fn leaves_escaped_spaces_alone() {
        assert_eq!(escape_spaces("a\\ b"), "a\\ b");
        assert_eq!(escape_spaces("a\\ b c"), "a\\ b\\ c");
    }

    #[test]
    fn no_spaces_is_borrowed() {
        assert!(matches!(escape_spaces("plain.key"), Cow::Borrowed(_)));
    }

    #[test]
    fn unescape_restores_spaces() {
        assert_eq!(unescape_spaces("my\\ key"), "my key");
        assert!(matches!(unescape_spaces("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn decodes_basic_escape() {
        assert_eq!(decode_unicode("a\\u0041b"), "aAb");
        assert_eq!(decode_unicode("\\u017elu\\u0165ou\\u010dk\\u00fd"), "žluťoučký");
    }

    #[test]
    fn accepts_either_hex_case() {
        assert_eq!(decode_unicode("\\u00e9\\u00E9"), "éé");
    }

    #[test]
    fn no_escapes_is_borrowed_and_unchanged() {
        let input = "no escapes";
        let out = decode_unicode(input);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, input);
    }

    #[test]
    fn malformed_escape_is_kept() {
        assert_eq!(decode_unicode("bad \\u12G4 here"), "bad \\u12G4 here");
        assert_eq!(decode_unicode("short \\u12"), "short \\u12");
    }

    #[test]
    fn surrogate_pair_is_combined() {
        assert_eq!(decode_unicode("\\uD83D\\uDE00"), "😀");
    }

    #[test]
    fn lone_surrogate_stays_escaped() {
        assert_eq!(decode_unicode("x\\uD83Dy"), "x\\uD83Dy");
    }

    #[test]
    fn display_key_unescapes_and_decodes() {
        assert_eq!(display_key("caf\\u00e9\\ menu"), "café menu");
    }

    proptest! {
        #[test]
        fn escape_spaces_is_idempotent(s in "[a-z \\\\.]{0,24}") {
            let once = escape_spaces(&s).into_owned();
            let twice = escape_spaces(&once).into_owned();
            prop_assert_eq!(once, twice);
        }
    }
}
