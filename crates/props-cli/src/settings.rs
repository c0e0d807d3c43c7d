//! Optional TOML settings file.
//!
//! ```toml
//! [clean]
//! add_spaces = true
//! strip_comments = false
//! utf8 = true
//!
//! [locate]
//! timeout_secs = 30
//! jobs = 8
//! filext = "java,jsp,xml"
//! git = "/usr/bin/git"
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub clean: CleanSettings,
    pub locate: LocateSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanSettings {
    pub add_spaces: bool,
    pub strip_comments: bool,
    pub utf8: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocateSettings {
    /// Per-lookup time limit in seconds.
    pub timeout_secs: u64,
    /// Concurrent lookups with `--multi`; 0 picks the number of CPUs.
    pub jobs: usize,
    /// Default extension filter, comma-delimited.
    pub filext: Option<String>,
    pub git: String,
}

impl Default for LocateSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            jobs: 0,
            filext: None,
            git: "git".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing settings {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
