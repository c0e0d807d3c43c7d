//! Search backends.
//!
//! [`KeySearcher`] is the seam between the lookup driver and whatever does the
//! actual searching. [`GitGrep`] shells out to `git grep -c`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{LocateError, LocateResult};
use crate::plan::{KeyLookup, LocateConfig};

/// Something that can tell whether a key occurs in a source tree.
#[async_trait]
pub trait KeySearcher: Send + Sync {
    /// Search for `lookup.term`. `Some(context)` means found.
    async fn search(&self, lookup: &KeyLookup) -> LocateResult<Option<String>>;

    /// Human-readable description of the search performed for `lookup`.
    fn describe(&self, lookup: &KeyLookup) -> String;
}

/// `git grep -c "<term>" [branch] [-- pathspec...]` run inside a repository.
#[derive(Clone, Debug)]
pub struct GitGrep {
    repo: PathBuf,
    git: String,
    pathspec: Vec<String>,
    timeout: Duration,
}

impl GitGrep {
    pub fn new(repo: impl Into<PathBuf>, config: &LocateConfig) -> Self {
        Self {
            repo: repo.into(),
            git: config.git.clone(),
            pathspec: config.pathspec_args(),
            timeout: config.timeout,
        }
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    /// Report the git version, failing if git cannot be run at all.
    pub async fn version(&self) -> LocateResult<String> {
        let mut command = Command::new(&self.git);
        command.arg("--version").stdin(Stdio::null()).kill_on_drop(true);
        let output = tokio::time::timeout(Duration::from_secs(5), command.output())
            .await
            .map_err(|_| LocateError::ToolNotFound(format!("{} --version timed out", self.git)))?
            .map_err(|e| LocateError::ToolNotFound(format!("{}: {e}", self.git)))?;

        if !output.status.success() {
            return Err(LocateError::ToolNotFound(format!(
                "{} --version exited with {}",
                self.git, output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Full argument list passed to git for `lookup`.
    pub fn args(&self, lookup: &KeyLookup) -> Vec<String> {
        // Quoted so that only string literals of the key are counted.
        let mut args = vec![
            "grep".to_string(),
            "-c".to_string(),
            format!("\"{}\"", lookup.term),
        ];
        args.extend(self.pathspec.iter().cloned());
        args
    }
}

#[async_trait]
impl KeySearcher for GitGrep {
    async fn search(&self, lookup: &KeyLookup) -> LocateResult<Option<String>> {
        let mut command = Command::new(&self.git);
        command
            .args(self.args(lookup))
            .current_dir(&self.repo)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| LocateError::Timeout {
                key: lookup.raw.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| LocateError::Spawn {
                key: lookup.raw.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(key = %lookup.raw, status = %output.status, hits = stdout.lines().count(), "git grep finished");
        Ok((!stdout.is_empty()).then_some(stdout))
    }

    fn describe(&self, lookup: &KeyLookup) -> String {
        let mut parts = vec![self.git.clone()];
        parts.extend(self.args(lookup));
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(raw: &str) -> KeyLookup {
        KeyLookup::new(raw)
    }

    #[test]
    fn command_line_quotes_the_term() {
        let config = LocateConfig {
            branch: Some("main".into()),
            file_extensions: vec!["java".into()],
            ..Default::default()
        };
        let grep = GitGrep::new("/repo", &config);
        assert_eq!(
            grep.describe(&lookup("my\\ key")),
            "git grep -c \"my key\" main -- *.java"
        );
    }

    #[tokio::test]
    async fn missing_git_binary_is_reported() {
        let config = LocateConfig {
            git: "definitely-not-a-git-binary-xyz".into(),
            ..Default::default()
        };
        let grep = GitGrep::new(".", &config);
        assert!(matches!(grep.version().await, Err(LocateError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn spawn_failure_is_an_error() {
        let config = LocateConfig {
            git: "definitely-not-a-git-binary-xyz".into(),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let grep = GitGrep::new(dir.path(), &config);
        assert!(matches!(
            grep.search(&lookup("k")).await,
            Err(LocateError::Spawn { .. })
        ));
    }
}
