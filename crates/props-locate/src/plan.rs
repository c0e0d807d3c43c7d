//! Turning a property table into a list of lookups.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use props_core::{display_key, PropertyTable};

/// Where and how to search for keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocateConfig {
    /// Branch (or any tree-ish) to search instead of the working tree.
    pub branch: Option<String>,
    /// Restrict the search to this repository sub-directory.
    pub subdir: Option<String>,
    /// Only search files with these extensions (without the dot).
    pub file_extensions: Vec<String>,
    /// Per-lookup time limit.
    pub timeout: Duration,
    /// Maximum concurrent lookups; `1` runs them one after another.
    pub jobs: usize,
    /// The git executable.
    pub git: String,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            branch: None,
            subdir: None,
            file_extensions: Vec::new(),
            timeout: Duration::from_secs(20),
            jobs: 1,
            git: "git".to_string(),
        }
    }
}

impl LocateConfig {
    /// Parse a comma-delimited extension list such as `java, jsp,xml`.
    pub fn parse_extensions(list: &str) -> Vec<String> {
        list.split(',')
            .map(|ext| ext.trim().trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Arguments following the search pattern: the branch, then a pathspec.
    pub fn pathspec_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(branch) = self.branch.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            args.push(branch.to_string());
        }

        let subdir = self
            .subdir
            .as_deref()
            .map(|s| s.trim().trim_matches('/').trim())
            .filter(|s| !s.is_empty());

        if !self.file_extensions.is_empty() {
            args.push("--".to_string());
            let prefix = subdir.map(|s| format!("{s}/")).unwrap_or_default();
            for ext in &self.file_extensions {
                args.push(format!("{prefix}*.{}", ext.trim()));
            }
        } else if let Some(subdir) = subdir {
            args.push("--".to_string());
            args.push(subdir.to_string());
        }

        args
    }
}

/// One key to look up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyLookup {
    /// The key as stored in the table (spaces escaped, unicode escaped).
    pub raw: String,
    /// The text searched for: spaces unescaped, unicode decoded.
    pub term: String,
}

impl KeyLookup {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let term = display_key(&raw);
        Self { raw, term }
    }

    /// How the key is shown in reports: the term, or `raw|term` when the two
    /// spellings differ.
    pub fn label(&self) -> String {
        if self.raw == self.term {
            self.term.clone()
        } else {
            format!("{}|{}", self.raw, self.term)
        }
    }
}

/// One lookup per distinct key, in ascending key order.
pub fn plan_lookups(table: &PropertyTable) -> Vec<KeyLookup> {
    table
        .keys()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(KeyLookup::new)
        .collect()
}
