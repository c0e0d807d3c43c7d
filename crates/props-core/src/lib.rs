//! Properties normalization engine.
//!
//! Reads the restricted `.properties` dialect (single-line `key=value` pairs,
//! `#`/`!` comments, backslash continuation on comment lines only), regroups
//! keys under a two-level prefix hierarchy and writes them back out in a
//! deterministic layout that flags duplicate keys.
//!
//! All functions are pure transformations over borrowed input and can be
//! called from any number of threads at once.
//!
//! # Key Types
//!
//! - [`PropertyTable`] / [`ValueEntry`] -- Parsed, multi-valued key table
//! - [`GroupedTable`] / [`CommentMap`] -- Prefix grouping consumed by the formatter
//! - [`FormatOptions`] / [`FormatOutput`] -- Serialization controls and result
//! - [`PropsError`] -- Load/save failure taxonomy

pub mod error;
pub mod format;
pub mod grouping;
pub mod normalize;
pub mod parser;
pub mod table;

pub use error::{PropsError, PropsResult};
pub use format::{format, format_report, FormatOptions, FormatOutput, DUPLICATE_MARKER};
pub use grouping::{bucket_of, group, Bucket, CommentMap, GroupedTable, Grouper, SINGLES_GROUP};
pub use normalize::{decode_unicode, display_key, escape_spaces, unescape_spaces};
pub use parser::{parse, parse_bytes, ParseOptions};
pub use table::{PropertyTable, ValueEntry};

/// Sort, group and format a table in one go.
pub fn normalize_table(
    table: PropertyTable,
    strip_comments: bool,
    options: &FormatOptions,
) -> FormatOutput {
    let (grouped, comments) = group(&table.sorted());
    let comments = if strip_comments { None } else { Some(&comments) };
    format_report(&grouped, comments, options)
}
