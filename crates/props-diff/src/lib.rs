//! Comparison of parsed properties tables.
//!
//! # Key Types
//!
//! - [`KeyDiff`] -- Keys present on only one side
//! - [`ValueDifference`] -- Keys whose first values differ
//! - [`Comparison`] -- Both of the above, serializable for reports
//! - [`TextDiff`] / [`DiffLine`] -- Line-level diff of two cleaned documents

pub mod error;
pub mod table_diff;
pub mod text_diff;

pub use error::{DiffError, DiffResult};
pub use table_diff::{compare, diff_keys, diff_values, Comparison, KeyDiff, ValueDifference};
pub use text_diff::{diff_text, DiffLine, TextDiff};
