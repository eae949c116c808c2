//! SNMP Walk Parser
//!
//! Parses `snmpwalk` text output. Both symbolic and numeric forms are
//! accepted:
//!
//! ```text
//! SW-MIB::swFCPortName.3 = STRING: "port3"
//! SNMPv2-SMI::enterprises.1588.2.1.1.1.6.2.1.36.3 = STRING: "port3"
//! .1.3.6.1.4.1.1588.2.1.1.1.6.2.1.36.3 = STRING: "port3"
//! ```
//!
//! Unresolved `enterprises.` and `iso.` paths are expanded to numeric
//! OIDs so they match numeric columns.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// Walk Entry
// =============================================================================

/// One parsed walk line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkEntry {
    /// MIB module name, empty for numeric output
    pub mib: String,
    /// Object name (or numeric column OID)
    pub object: String,
    /// Last arc of the instance OID
    pub index: String,
    /// Value type, e.g. `STRING`, `INTEGER`, `Gauge32`
    pub value_type: String,
    /// Value with surrounding quotes removed
    pub value: String,
}

impl WalkEntry {
    /// Parse one walk line; lines without a typed value yield `None`
    pub fn parse(line: &str) -> Option<Self> {
        let (lhs, rhs) = line.split_once(" = ")?;
        let (value_type, value) = rhs.split_once(':')?;
        let (mib, path) = split_instance(lhs);

        let (object, index) = match path.rsplit_once('.') {
            Some((column, index)) => (column, index),
            None => (path.as_str(), ""),
        };
        let object = if is_numeric_oid(&path) {
            object.to_string()
        } else {
            path.split('.').next().unwrap_or_default().to_string()
        };

        Some(Self {
            mib: mib.to_string(),
            object,
            index: index.to_string(),
            value_type: value_type.trim().to_string(),
            value: value.trim().trim_matches('"').to_string(),
        })
    }
}

const ENTERPRISES: &str = "1.3.6.1.4.1";

/// Strip leading dots and expand the `iso` and `enterprises` aliases so
/// numeric OIDs compare cleanly
fn normalize_oid(oid: &str) -> String {
    let oid = oid.trim_start_matches('.');
    if let Some(rest) = oid.strip_prefix("iso.") {
        format!("1.{}", rest)
    } else if let Some(rest) = oid.strip_prefix("enterprises.") {
        format!("{}.{}", ENTERPRISES, rest)
    } else {
        oid.to_string()
    }
}

/// Split the left-hand side of a walk line into MIB module and
/// normalized instance path
fn split_instance(lhs: &str) -> (&str, String) {
    let lhs = lhs.trim();
    match lhs.split_once("::") {
        Some((mib, path)) => (mib, normalize_oid(path)),
        None => ("", normalize_oid(lhs)),
    }
}

fn is_numeric_oid(path: &str) -> bool {
    path.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

/// Parse every line, skipping those without a typed value
pub fn parse_walk<S: AsRef<str>>(lines: &[S]) -> Vec<WalkEntry> {
    lines
        .iter()
        .filter_map(|line| {
            let line = line.as_ref();
            let entry = WalkEntry::parse(line);
            if entry.is_none() && !line.trim().is_empty() {
                debug!(line, "Skipping untyped walk line");
            }
            entry
        })
        .collect()
}

// =============================================================================
// Walk Set
// =============================================================================

/// Raw walk output grouped by the column OID (or object name) it answers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalkSet {
    walks: IndexMap<String, Vec<String>>,
}

impl WalkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the output of walking `column`
    pub fn insert<S: Into<String>>(&mut self, column: &str, lines: Vec<S>) {
        self.walks
            .entry(normalize_oid(column))
            .or_default()
            .extend(lines.into_iter().map(Into::into));
    }

    /// Split one concatenated walk dump into the given columns.
    ///
    /// Each line goes to the longest column that prefixes its instance
    /// OID. Symbolic columns (`xivFailedDisks`) match on the object name.
    pub fn group<S: AsRef<str>>(lines: &[S], columns: &[&str]) -> Self {
        let mut set = Self::new();
        for line in lines {
            let line = line.as_ref();
            let Some((lhs, _)) = line.split_once(" = ") else {
                continue;
            };
            let (_, instance) = split_instance(lhs);

            let column = columns
                .iter()
                .map(|c| c.trim_start_matches('.'))
                .filter(|c| {
                    instance == *c
                        || (instance.starts_with(c) && instance[c.len()..].starts_with('.'))
                })
                .max_by_key(|c| c.len());
            match column {
                Some(column) => set.insert(column, vec![line.to_string()]),
                None => debug!(line, "Walk line matches no known column"),
            }
        }
        set
    }

    /// Index to value mapping of one column
    pub fn column(&self, column: &str) -> IndexMap<String, String> {
        self.walks
            .get(&normalize_oid(column))
            .map(|lines| {
                parse_walk(lines)
                    .into_iter()
                    .map(|entry| (entry.index, entry.value))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First value of a column, for scalar objects
    pub fn scalar(&self, column: &str) -> Option<String> {
        self.column(column).into_values().next()
    }

    /// Full entries of one column (value types included)
    pub fn entries(&self, column: &str) -> Vec<WalkEntry> {
        self.walks
            .get(&normalize_oid(column))
            .map(|lines| parse_walk(lines))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.walks.values().all(Vec::is_empty)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.walks.keys().map(String::as_str)
    }
}
