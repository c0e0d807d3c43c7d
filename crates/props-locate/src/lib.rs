//! Locating properties keys in source trees.
//!
//! A lookup plan is derived from a parsed table, each key is searched with a
//! [`KeySearcher`] (by default [`GitGrep`]), and the outcomes are split into
//! found/missing reports.
//!
//! # Key Types
//!
//! - [`LocateConfig`] / [`KeyLookup`] -- Search scope and per-key search terms
//! - [`KeySearcher`] / [`GitGrep`] -- Search backend seam and its git implementation
//! - [`Progress`] / [`LookupOutcome`] -- Driver events and results
//! - [`LocateReport`] -- Found/missing report rendering

pub mod driver;
pub mod error;
pub mod plan;
pub mod report;
pub mod search;

pub use driver::{run_lookups, LookupOutcome, Progress};
pub use error::{LocateError, LocateResult};
pub use plan::{plan_lookups, KeyLookup, LocateConfig};
pub use report::{report_file_names, LocateReport};
pub use search::{GitGrep, KeySearcher};
