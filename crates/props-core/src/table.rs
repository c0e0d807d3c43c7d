//! The parsed property table.
//!
//! A [`PropertyTable`] maps each normalized key to the ordered list of its
//! distinct occurrences. Key order is file order until [`PropertyTable::sorted`]
//! is applied.

use std::collections::HashMap;

/// One occurrence of a key: its value and the comment block preceding it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueEntry {
    /// The trimmed value text.
    pub value: String,
    /// Comment lines collected since the previous key/value line, if any.
    pub comments: Option<Vec<String>>,
}

impl ValueEntry {
    /// Create an entry without comments.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            comments: None,
        }
    }

    /// Create an entry with an attached comment block.
    ///
    /// An empty block is stored as `None`.
    pub fn with_comments(value: impl Into<String>, comments: Vec<String>) -> Self {
        Self {
            value: value.into(),
            comments: if comments.is_empty() { None } else { Some(comments) },
        }
    }
}

/// Ordered, multi-valued key table produced by the parser.
#[derive(Clone, Debug, Default)]
pub struct PropertyTable {
    entries: Vec<(String, Vec<ValueEntry>)>,
    index: HashMap<String, usize>,
}

impl PropertyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record an occurrence of `key`.
    ///
    /// A repeated key only gains a new entry when its value differs from every
    /// value already recorded for it; comments play no part in that check.
    /// Returns `true` if the entry was stored.
    pub fn insert(&mut self, key: impl Into<String>, entry: ValueEntry) -> bool {
        let key = key.into();
        match self.index.get(&key) {
            Some(&slot) => {
                let values = &mut self.entries[slot].1;
                if values.iter().any(|existing| existing.value == entry.value) {
                    return false;
                }
                values.push(entry);
                true
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![entry]));
                true
            }
        }
    }

    /// All recorded occurrences of `key`.
    pub fn get(&self, key: &str) -> Option<&[ValueEntry]> {
        self.slot(key).map(|slot| self.entries[slot].1.as_slice())
    }

    /// The value of the first occurrence of `key`.
    pub fn first_value(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(|entry| entry.value.as_str())
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.slot(key).is_some()
    }

    /// Keys in table order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// `(key, occurrences)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ValueEntry])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Consume the table into a copy ordered by key.
    pub fn sorted(mut self) -> Self {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        self.reindex();
        self
    }

    fn slot(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(slot, (key, _))| (key.clone(), slot))
            .collect();
    }
}

impl PartialEq for PropertyTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for PropertyTable {}

impl<K: Into<String>> FromIterator<(K, ValueEntry)> for PropertyTable {
    fn from_iter<I: IntoIterator<Item = (K, ValueEntry)>>(iter: I) -> Self {
        let mut table = PropertyTable::new();
        for (key, entry) in iter {
            table.insert(key, entry);
        }
        table
    }
}
