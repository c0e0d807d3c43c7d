//! Key and value comparison of two property tables.
//!
//! Value comparison only ever looks at the first recorded occurrence of a key
//! on each side. Extra duplicate values are not inspected, so a key holding
//! `["1", "2"]` in one table and `["1"]` in the other compares equal.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use props_core::PropertyTable;

use crate::error::DiffResult;

/// Keys present on only one side, each list sorted ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDiff {
    /// Keys found in `b` but not in `a`.
    pub missing_in_a: Vec<String>,
    /// Keys found in `a` but not in `b`.
    pub missing_in_b: Vec<String>,
}

impl KeyDiff {
    /// Returns `true` if both tables have the same key set.
    pub fn is_empty(&self) -> bool {
        self.missing_in_a.is_empty() && self.missing_in_b.is_empty()
    }
}

/// A key whose first value differs between the two tables.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueDifference {
    pub key: String,
    pub value_a: String,
    pub value_b: String,
}

/// Symmetric key set difference.
pub fn diff_keys(a: &PropertyTable, b: &PropertyTable) -> KeyDiff {
    let keys_a: BTreeSet<&str> = a.keys().collect();
    let keys_b: BTreeSet<&str> = b.keys().collect();

    KeyDiff {
        missing_in_a: keys_b.difference(&keys_a).map(|k| k.to_string()).collect(),
        missing_in_b: keys_a.difference(&keys_b).map(|k| k.to_string()).collect(),
    }
}

/// First-value differences for keys present in both tables, sorted.
pub fn diff_values(a: &PropertyTable, b: &PropertyTable) -> Vec<ValueDifference> {
    let mut differences: Vec<ValueDifference> = a
        .keys()
        .filter_map(|key| {
            let value_a = a.first_value(key)?;
            let value_b = b.first_value(key)?;
            (value_a != value_b).then(|| ValueDifference {
                key: key.to_string(),
                value_a: value_a.to_string(),
                value_b: value_b.to_string(),
            })
        })
        .collect();
    differences.sort();
    differences
}

/// Full comparison of two tables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub keys: KeyDiff,
    /// Only filled when values were compared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ValueDifference>>,
}

impl Comparison {
    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> DiffResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Compare key sets and, if requested, first values.
pub fn compare(a: &PropertyTable, b: &PropertyTable, with_values: bool) -> Comparison {
    Comparison {
        keys: diff_keys(a, b),
        values: with_values.then(|| diff_values(a, b)),
    }
}
