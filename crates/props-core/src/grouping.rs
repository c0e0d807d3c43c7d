//! Two-level prefix grouping.
//!
//! Keys are bucketed by their first two dot-separated segments. Keys with a
//! single segment go to the synthetic `("_singles", "")` bucket. Buckets are
//! kept in first-seen order, so grouping an already key-sorted table yields
//! buckets in ascending key order; the formatter relies on that.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::table::PropertyTable;

/// First-level name of the bucket holding single-segment keys.
pub const SINGLES_GROUP: &str = "_singles";

/// Comment lines per key, concatenated over all of the key's occurrences.
pub type CommentMap = BTreeMap<String, Vec<String>>;

/// One `(first, second)` prefix bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bucket {
    first: String,
    second: String,
    keys: BTreeMap<String, Vec<String>>,
}

impl Bucket {
    /// First-level prefix.
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Second-level prefix.
    pub fn second(&self) -> &str {
        &self.second
    }

    /// Number of keys in the bucket.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the bucket holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `(key, values)` pairs in ascending key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Values recorded for `key`.
    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.keys.get(key).map(Vec::as_slice)
    }
}

/// Keys organized as `first -> second -> key -> values`.
#[derive(Clone, Debug, Default)]
pub struct GroupedTable {
    buckets: Vec<Bucket>,
    index: HashMap<(String, String), usize>,
}

impl GroupedTable {
    /// Create an empty grouping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no key has been grouped.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of keys across all buckets.
    pub fn key_count(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    /// Distinct first-level prefixes in ascending order.
    pub fn first_levels(&self) -> Vec<&str> {
        self.buckets
            .iter()
            .map(Bucket::first)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Buckets under `first`, in the order they were created.
    pub fn buckets(&self, first: &str) -> impl Iterator<Item = &Bucket> {
        let first = first.to_string();
        self.buckets.iter().filter(move |b| b.first == first)
    }

    /// Look up a single bucket.
    pub fn bucket(&self, first: &str, second: &str) -> Option<&Bucket> {
        self.index
            .get(&(first.to_string(), second.to_string()))
            .map(|&slot| &self.buckets[slot])
    }

    /// Add `values` for `key`, merging with values already grouped for it.
    ///
    /// On a repeated key only values not yet present are appended.
    pub fn insert(&mut self, key: &str, values: Vec<String>) {
        let (first, second) = bucket_of(key);
        let slot = match self.index.get(&(first.to_string(), second.to_string())) {
            Some(&slot) => slot,
            None => {
                let slot = self.buckets.len();
                self.buckets.push(Bucket {
                    first: first.to_string(),
                    second: second.to_string(),
                    keys: BTreeMap::new(),
                });
                self.index.insert((first.to_string(), second.to_string()), slot);
                slot
            }
        };

        let existing = self.buckets[slot].keys.entry(key.to_string()).or_default();
        if existing.is_empty() {
            *existing = values;
            return;
        }
        for value in values {
            if !existing.contains(&value) {
                existing.push(value);
            }
        }
    }
}

/// The `(first, second)` bucket a key belongs to.
pub fn bucket_of(key: &str) -> (&str, &str) {
    let mut segments = key.split('.');
    match (segments.next(), segments.next()) {
        (Some(first), Some(second)) => (first, second),
        _ => (SINGLES_GROUP, ""),
    }
}

/// Accumulates one or more tables into a single grouping.
#[derive(Debug, Default)]
pub struct Grouper {
    grouped: GroupedTable,
    comments: CommentMap,
}

impl Grouper {
    /// Create an empty grouper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a table. Callers sort it by key first for deterministic output.
    pub fn add_table(&mut self, table: &PropertyTable) -> &mut Self {
        for (key, occurrences) in table.iter() {
            let mut values = Vec::with_capacity(occurrences.len());
            for entry in occurrences {
                values.push(entry.value.clone());
                if let Some(block) = &entry.comments {
                    self.comments
                        .entry(key.to_string())
                        .or_default()
                        .extend(block.iter().cloned());
                }
            }
            self.grouped.insert(key, values);
        }
        self
    }

    /// Finish grouping.
    pub fn finish(self) -> (GroupedTable, CommentMap) {
        (self.grouped, self.comments)
    }
}

/// Group a single key-sorted table.
pub fn group(table: &PropertyTable) -> (GroupedTable, CommentMap) {
    let mut grouper = Grouper::new();
    grouper.add_table(table);
    grouper.finish()
}
