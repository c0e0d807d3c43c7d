//! Deterministic serialization of a grouped table.
//!
//! Layout, top to bottom:
//!
//! ```text
//! ##### Source file: <label> #####      (only with a source label)
//!
//! # <first>                             (first levels ascending)
//!
//! ## <first>.<second>                   (only for buckets with 2+ keys)
//! ### DUPLICATE KEY ###                 (keys with 2+ values)
//! <comment lines>                       (repeated before every value)
//! key=value
//!
//!
//! ### Duplicate keys ###                (only if any)
//! ## <key>
//!
//! #####
//! ```

use serde::{Deserialize, Serialize};

use crate::grouping::{CommentMap, GroupedTable};

/// Marker placed before a key that carries more than one value.
pub const DUPLICATE_MARKER: &str = "### DUPLICATE KEY ###";

/// Heading of the trailing duplicate key report.
pub const DUPLICATE_REPORT_HEADING: &str = "### Duplicate keys ###";

/// Serialization options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Emitted as `##### Source file: <label> #####` at the top.
    pub source_label: Option<String>,
    /// Write `key = value` instead of `key=value`.
    pub add_spaces: bool,
}

/// Formatted text together with the duplicate keys found while writing it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatOutput {
    pub text: String,
    /// Keys with more than one value, in the order they were written.
    pub duplicate_keys: Vec<String>,
}

/// Serialize a grouping to text.
///
/// Passing `None` for `comments` strips all comments from the output.
pub fn format(grouped: &GroupedTable, comments: Option<&CommentMap>, options: &FormatOptions) -> String {
    format_report(grouped, comments, options).text
}

/// Serialize a grouping and report the duplicate keys encountered.
pub fn format_report(
    grouped: &GroupedTable,
    comments: Option<&CommentMap>,
    options: &FormatOptions,
) -> FormatOutput {
    let mut lines: Vec<String> = Vec::new();
    let mut duplicate_keys = Vec::new();

    if let Some(label) = &options.source_label {
        lines.push(format!("##### Source file: {label} #####"));
    }

    for first in grouped.first_levels() {
        lines.push(format!("\n# {first}"));

        for bucket in grouped.buckets(first) {
            if bucket.len() > 1 {
                lines.push(format!("\n## {first}.{}", bucket.second()));
            }

            for (key, values) in bucket.entries() {
                if values.len() > 1 {
                    lines.push(DUPLICATE_MARKER.to_string());
                    duplicate_keys.push(key.to_string());
                }

                let key_comments = comments.and_then(|map| map.get(key));
                for value in values {
                    for comment in key_comments.into_iter().flatten() {
                        lines.push(comment_line(comment));
                    }
                    if options.add_spaces {
                        lines.push(format!("{key} = {value}"));
                    } else {
                        lines.push(format!("{key}={value}"));
                    }
                }
            }
        }
    }

    if !duplicate_keys.is_empty() {
        lines.push(format!("\n\n{DUPLICATE_REPORT_HEADING}"));
        lines.extend(duplicate_keys.iter().map(|key| format!("## {key}")));
    }

    lines.push("\n#####\n".to_string());

    let mut text = lines.join("\n");
    text.push_str("\n\n");
    FormatOutput {
        text,
        duplicate_keys,
    }
}

/// Continuation lines were stored without a comment prefix; indent them.
fn comment_line(comment: &str) -> String {
    if comment.starts_with('#') || comment.starts_with('!') {
        comment.to_string()
    } else {
        format!("  {comment}")
    }
}
