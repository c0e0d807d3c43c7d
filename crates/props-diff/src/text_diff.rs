//! Line diff of two cleaned documents.
//!
//! Cleaning both sides first puts keys in the same order, so a plain Myers
//! line diff (via `similar`) lines up related keys.

use std::fmt;

use similar::{ChangeTag, TextDiff as SimilarDiff};

/// One line of a diff, with its kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

/// Grouped changes between two documents, with surrounding context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextDiff {
    /// Each inner list is one hunk.
    pub hunks: Vec<Vec<DiffLine>>,
}

impl TextDiff {
    /// Returns `true` if both documents are identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Number of added lines.
    pub fn additions(&self) -> usize {
        self.count(|l| matches!(l, DiffLine::Added(_)))
    }

    /// Number of removed lines.
    pub fn deletions(&self) -> usize {
        self.count(|l| matches!(l, DiffLine::Removed(_)))
    }

    fn count(&self, pred: impl Fn(&DiffLine) -> bool) -> usize {
        self.hunks.iter().flatten().filter(|l| pred(l)).count()
    }
}

impl fmt::Display for TextDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hunk) in self.hunks.iter().enumerate() {
            if i > 0 {
                writeln!(f, "...")?;
            }
            for line in hunk {
                match line {
                    DiffLine::Context(text) => writeln!(f, " {text}")?,
                    DiffLine::Added(text) => writeln!(f, "+{text}")?,
                    DiffLine::Removed(text) => writeln!(f, "-{text}")?,
                }
            }
        }
        Ok(())
    }
}

/// Diff `old` against `new` line by line, keeping `context` lines around
/// each change.
pub fn diff_text(old: &str, new: &str, context: usize) -> TextDiff {
    if old == new {
        return TextDiff::default();
    }

    let diff = SimilarDiff::from_lines(old, new);
    let hunks = diff
        .grouped_ops(context)
        .iter()
        .map(|group| {
            group
                .iter()
                .flat_map(|op| diff.iter_changes(op))
                .map(|change| {
                    let text = change.value().trim_end_matches(['\r', '\n']).to_string();
                    match change.tag() {
                        ChangeTag::Equal => DiffLine::Context(text),
                        ChangeTag::Insert => DiffLine::Added(text),
                        ChangeTag::Delete => DiffLine::Removed(text),
                    }
                })
                .collect()
        })
        .collect();

    TextDiff { hunks }
}
