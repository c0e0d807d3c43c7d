//! Line-oriented `.properties` reader.
//!
//! The accepted grammar is deliberately narrow:
//!
//! - a trimmed line starting with `#` or `!` is a comment; a trailing `\`
//!   makes the *next* non-blank line part of the comment block as well;
//! - any other line containing `=` is a `key=value` pair split on the first
//!   `=`, unless a comment continuation is pending;
//! - any other non-blank line is folded into the pending comment block;
//! - blank lines are skipped and leave the pending comment state untouched.
//!
//! The pending comment block is attached to the next key/value pair.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PropsError, PropsResult};
use crate::normalize::{decode_unicode, escape_spaces};
use crate::table::{PropertyTable, ValueEntry};

/// Options controlling how values are read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Decode `\uXXXX` escapes in values into UTF-8 characters.
    pub decode_unicode_values: bool,
}

impl ParseOptions {
    /// Options with value decoding switched on or off.
    pub fn decode_values(decode_unicode_values: bool) -> Self {
        Self {
            decode_unicode_values,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Normal,
    CommentAccumulating,
}

/// Parse properties text into a table.
///
/// Never fails: text that fits none of the line rules ends up in comment
/// blocks. An input without any `key=value` line yields an empty table.
pub fn parse(text: &str, options: ParseOptions) -> PropertyTable {
    let mut table = PropertyTable::new();
    let mut comments: Vec<String> = Vec::new();
    let mut mode = Mode::Normal;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if is_comment(line) {
            comments.push(line.to_string());
            if line.ends_with('\\') {
                mode = Mode::CommentAccumulating;
            }
            continue;
        }

        match (mode, line.split_once('=')) {
            (Mode::Normal, Some((key, value))) => {
                let key = escape_spaces(key.trim()).into_owned();
                let value = value.trim();
                let value = if options.decode_unicode_values {
                    decode_unicode(value).into_owned()
                } else {
                    value.to_string()
                };

                let entry = ValueEntry::with_comments(value, std::mem::take(&mut comments));
                if !table.insert(key.as_str(), entry) {
                    debug!(key = %key, "repeated key with an already recorded value, skipped");
                }
            }
            _ => comments.push(line.to_string()),
        }
        mode = Mode::Normal;
    }

    table
}

/// Parse raw bytes, which must be valid UTF-8.
///
/// `origin` only labels the error.
pub fn parse_bytes(bytes: &[u8], origin: &Path, options: ParseOptions) -> PropsResult<PropertyTable> {
    let text = std::str::from_utf8(bytes).map_err(|e| PropsError::Decode {
        path: origin.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(parse(text, options))
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with('!')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<'a>(table: &'a PropertyTable, key: &str) -> Vec<&'a str> {
        table
            .get(key)
            .unwrap_or_default()
            .iter()
            .map(|e| e.value.as_str())
            .collect()
    }

    #[test]
    fn simple_pairs_in_file_order() {
        let table = parse("b=2\na = 1\n", ParseOptions::default());
        let keys: Vec<_> = table.keys().collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(table.first_value("a"), Some("1"));
    }

    #[test]
    fn splits_on_first_equals() {
        let table = parse("url=http://x?a=b", ParseOptions::default());
        assert_eq!(table.first_value("url"), Some("http://x?a=b"));
    }

    #[test]
    fn key_spaces_are_escaped() {
        let table = parse("my key = value", ParseOptions::default());
        assert_eq!(table.first_value("my\\ key"), Some("value"));
    }

    #[test]
    fn comments_attach_to_next_pair() {
        let text = "# first\n! second\n\nkey=v\nother=w\n";
        let table = parse(text, ParseOptions::default());

        let entry = &table.get("key").unwrap()[0];
        assert_eq!(
            entry.comments.as_deref(),
            Some(&["# first".to_string(), "! second".to_string()][..])
        );
        assert!(table.get("other").unwrap()[0].comments.is_none());
    }

    #[test]
    fn comment_continuation_swallows_next_line() {
        let text = "# long comment \\\nstill=comment\nkey=v\n";
        let table = parse(text, ParseOptions::default());

        assert!(!table.contains_key("still"));
        let comments = table.get("key").unwrap()[0].comments.clone().unwrap();
        assert_eq!(comments, ["# long comment \\", "still=comment"]);
    }

    #[test]
    fn continuation_survives_blank_and_comment_lines() {
        let text = "# a \\\n\n# b\nswallowed=1\nkey=v\n";
        let table = parse(text, ParseOptions::default());

        assert!(!table.contains_key("swallowed"));
        assert_eq!(table.get("key").unwrap()[0].comments.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn stray_lines_fold_into_comments() {
        let table = parse("not a pair\nkey=v", ParseOptions::default());
        assert_eq!(
            table.get("key").unwrap()[0].comments.as_deref(),
            Some(&["not a pair".to_string()][..])
        );
    }

    #[test]
    fn duplicates_keep_distinct_values_only() {
        let text = "x=1\n# dup\nx=1\nx=2\n";
        let table = parse(text, ParseOptions::default());
        assert_eq!(values(&table, "x"), ["1", "2"]);
        assert!(table.get("x").unwrap()[0].comments.is_none());
    }

    #[test]
    fn comments_of_discarded_duplicate_are_dropped() {
        let text = "x=1\n# lost\nx=1\ny=2\n";
        let table = parse(text, ParseOptions::default());
        assert!(table.get("y").unwrap()[0].comments.is_none());
    }

    #[test]
    fn unicode_values_decoded_on_request() {
        let text = "greeting=caf\\u00e9";
        let raw = parse(text, ParseOptions::default());
        assert_eq!(raw.first_value("greeting"), Some("caf\\u00e9"));

        let decoded = parse(text, ParseOptions::decode_values(true));
        assert_eq!(decoded.first_value("greeting"), Some("café"));
    }

    #[test]
    fn keys_are_not_unicode_decoded() {
        let table = parse("k\\u00e9y=v", ParseOptions::decode_values(true));
        assert!(table.contains_key("k\\u00e9y"));
    }

    #[test]
    fn crlf_input() {
        let table = parse("a=1\r\nb=2\r\n", ParseOptions::default());
        assert_eq!(table.first_value("a"), Some("1"));
        assert_eq!(table.first_value("b"), Some("2"));
    }

    #[test]
    fn only_comments_is_empty() {
        assert!(parse("# nothing here\n", ParseOptions::default()).is_empty());
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let err = parse_bytes(&[b'a', b'=', 0xFF, 0xFE], Path::new("bad.properties"), ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, PropsError::Decode { .. }));
    }
}
