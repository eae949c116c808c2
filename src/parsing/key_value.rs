//! Key-Value Parser
//!
//! Turns `Label: value` blocks into records. Lines are split at the first
//! colon, so values keep any colons of their own (timestamps, WWNs).

use crate::domain::model::{GroupedRecord, Record};
use indexmap::IndexSet;

/// Parses `Label: value` lines, optionally restricted to known labels
#[derive(Debug, Clone, Default)]
pub struct KeyValueParser {
    labels: Option<IndexSet<String>>,
}

impl KeyValueParser {
    /// Accept every label
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept only the given labels
    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: Some(labels.into_iter().map(Into::into).collect()),
        }
    }

    /// Single-value mode: a later occurrence of a label overwrites
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Record {
        let mut record = Record::new();
        for (label, value) in lines.iter().filter_map(|l| self.split(l.as_ref())) {
            record.insert(label, value);
        }
        record
    }

    /// Accumulate mode: values are collected per label in order
    pub fn parse_grouped<S: AsRef<str>>(&self, lines: &[S]) -> GroupedRecord {
        let mut grouped = GroupedRecord::new();
        for (label, value) in lines.iter().filter_map(|l| self.split(l.as_ref())) {
            grouped.push(label, value);
        }
        grouped
    }

    fn split<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let (label, value) = line.split_once(':')?;
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        match &self.labels {
            Some(known) if !known.contains(label) => None,
            _ => Some((label, value.trim())),
        }
    }
}
