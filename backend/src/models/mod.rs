//! Domain models for the identifier mapping run.
//!
//! - [`LookupTable`] - string to string map with last-write-wins inserts
//! - [`CorrespondenceTable`] - primary identifier (ID) to secondary identifier (ID2)
//! - [`FilenameCodeTable`] - input file name to code
//! - [`DerivedPair`] - one output row (ID3, ID4)
//! - [`SeenKeys`] - ID3 values already emitted during the run
//! - [`DeriveOutcome`] / [`FileOutcome`] - tagged results for rows and files

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Joins the file code and ID2 into ID3.
pub const ID3_SEPARATOR: &str = "_";

/// Number of leading ID3 characters kept in ID4.
pub const ID3_PREFIX_LEN: usize = 14;

/// Number of trailing primary identifier characters appended to ID4.
pub const ID_SUFFIX_LEN: usize = 4;

// =============================================================================
// Lookup Tables
// =============================================================================

/// Immutable key/value table loaded from a reference CSV.
///
/// Duplicate keys keep the last value seen; the number of overwritten
/// keys is tracked so callers can report it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    entries: HashMap<String, String>,
    overwritten: usize,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair. Returns `true` if an existing value was replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let replaced = self.entries.insert(key.into(), value.into()).is_some();
        if replaced {
            self.overwritten += 1;
        }
        replaced
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many inserts replaced an earlier value for the same key.
    pub fn overwritten(&self) -> usize {
        self.overwritten
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = LookupTable::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

/// Primary identifier (ID) to secondary identifier (ID2).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrespondenceTable(LookupTable);

impl CorrespondenceTable {
    /// Resolve a primary identifier.
    pub fn secondary_id(&self, primary_id: &str) -> Option<&str> {
        self.0.get(primary_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn overwritten(&self) -> usize {
        self.0.overwritten()
    }
}

impl From<LookupTable> for CorrespondenceTable {
    fn from(table: LookupTable) -> Self {
        Self(table)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CorrespondenceTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Input file name to the code that namespaces its derived keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilenameCodeTable(LookupTable);

impl FilenameCodeTable {
    /// Code for a file name (the bare name, not a path).
    pub fn code_for(&self, file_name: &str) -> Option<&str> {
        self.0.get(file_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn overwritten(&self) -> usize {
        self.0.overwritten()
    }
}

impl From<LookupTable> for FilenameCodeTable {
    fn from(table: LookupTable) -> Self {
        Self(table)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilenameCodeTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// Derived Output
// =============================================================================

/// One row of the output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedPair {
    #[serde(rename = "ID3")]
    pub id3: String,
    #[serde(rename = "ID4")]
    pub id4: String,
}

/// ID3 values emitted so far. Owned by a single run and shared across files.
#[derive(Debug, Clone, Default)]
pub struct SeenKeys {
    keys: HashSet<String>,
}

impl SeenKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id3: &str) -> bool {
        self.keys.contains(id3)
    }

    /// Record an ID3. Returns `false` if it was already present.
    pub fn insert(&mut self, id3: impl Into<String>) -> bool {
        self.keys.insert(id3.into())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// What happened to a single input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeriveOutcome {
    /// A new pair was produced and its ID3 recorded.
    Emitted(DerivedPair),
    /// The primary identifier has no correspondence entry.
    Unresolved,
    /// The derived ID3 was already emitted earlier in the run.
    Duplicate { id3: String },
}

/// Per-file statistics and the pairs it produced, in row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileReport {
    pub file_name: String,
    pub code: String,
    #[serde(skip)]
    pub pairs: Vec<DerivedPair>,
    pub rows_read: usize,
    pub emitted: usize,
    pub unresolved: usize,
    pub duplicates: usize,
}

/// What happened to a single input file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Processed(FileReport),
    /// The file name has no entry in the filename-code table.
    SkippedUnmapped { file_name: String },
}

impl FileOutcome {
    /// Pairs contributed by this file (empty when skipped).
    pub fn pairs(&self) -> &[DerivedPair] {
        match self {
            FileOutcome::Processed(report) => &report.pairs,
            FileOutcome::SkippedUnmapped { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_last_write_wins() {
        let mut table = LookupTable::new();
        assert!(!table.insert("a", "1"));
        assert!(table.insert("a", "2"));
        table.insert("b", "3");

        assert_eq!(table.get("a"), Some("2"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.overwritten(), 1);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table: CorrespondenceTable = [("AB12", "XY99")].into_iter().collect();
        assert_eq!(table.secondary_id("AB12"), Some("XY99"));
        assert_eq!(table.secondary_id("ab12"), None);
    }

    #[test]
    fn test_seen_keys_insert_once() {
        let mut seen = SeenKeys::new();
        assert!(seen.insert("Q1_XY99"));
        assert!(!seen.insert("Q1_XY99"));
        assert!(seen.contains("Q1_XY99"));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_skipped_file_has_no_pairs() {
        let outcome = FileOutcome::SkippedUnmapped { file_name: "x.csv".into() };
        assert!(outcome.pairs().is_empty());
    }
}
