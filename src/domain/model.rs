//! Domain Model - Records, tables and polling contexts
//!
//! Every parser and decoder in the crate produces these shapes. All maps
//! preserve insertion order so iteration (and therefore alarm ordering)
//! is deterministic for identical input.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// Context
// =============================================================================

/// Default context used when a transcript carries no virtual-fabric segment
pub const DEFAULT_CONTEXT: &str = "FID0";

/// A polling scope, e.g. a virtual fabric on a SAN switch
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(String);

impl ContextId {
    /// Build a context id, normalizing bare numeric ids to `FID<n>`
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<u64>() {
                return Self(format!("FID{}", n));
            }
        }
        Self(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self(DEFAULT_CONTEXT.to_string())
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContextId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// =============================================================================
// Record
// =============================================================================

/// Field name to string value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, String>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Set a field value, replacing any previous value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Merge another record into this one; fields absent from `other` are kept
    pub fn merge(&mut self, other: Record) {
        for (field, value) in other.0 {
            self.0.insert(field, value);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// =============================================================================
// Table
// =============================================================================

/// Ordered field names plus records keyed by their primary key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    fields: Vec<String>,
    records: IndexMap<String, Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with a known field order
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            records: IndexMap::new(),
        }
    }

    /// Ordered field names seen so far
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    /// Merge a record under `key`, creating it if absent
    pub fn merge_record(&mut self, key: impl Into<String>, record: Record) {
        for field in record.fields() {
            if !self.fields.iter().any(|f| f == field) {
                self.fields.push(field.to_string());
            }
        }
        self.records.entry(key.into()).or_default().merge(record);
    }

    /// Set one field of the record under `key`, creating the record if absent
    pub fn set(&mut self, key: &str, field: &str, value: impl Into<String>) {
        let mut record = Record::new();
        record.insert(field, value);
        self.merge_record(key, record);
    }

    /// Merge every record of another table into this one
    pub fn merge(&mut self, other: Table) {
        for (key, record) in other.records {
            self.merge_record(key, record);
        }
    }

    /// Find the key of the first record whose fields match all of `criteria`
    pub fn find_key(&self, criteria: &[(&str, &str)]) -> Option<&str> {
        self.records
            .iter()
            .find(|(_, record)| {
                criteria
                    .iter()
                    .all(|(field, value)| record.get(field) == Some(*value))
            })
            .map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.records.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

// =============================================================================
// Grouped Record
// =============================================================================

/// Label to ordered value list, one position per physical unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedRecord(IndexMap<String, Vec<String>>);

impl GroupedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to the list for `label`
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.0.entry(label.into()).or_default().push(value.into());
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.0.get(label).map(Vec::as_slice)
    }

    /// Number of units, i.e. the longest value list
    pub fn units(&self) -> usize {
        self.0.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Project the values at position `index` into a flat record
    pub fn unit(&self, index: usize) -> Record {
        self.0
            .iter()
            .filter_map(|(label, values)| values.get(index).map(|v| (label.clone(), v.clone())))
            .collect()
    }

    /// Append every list of `other` to the matching list here
    pub fn merge(&mut self, other: GroupedRecord) {
        for (label, values) in other.0 {
            self.0.entry(label).or_default().extend(values);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
