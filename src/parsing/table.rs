//! Fixed-Width Table Parser
//!
//! Turns column-aligned vendor listings into keyed tables. Column
//! boundaries come from the dash separator line printed under the header:
//!
//! ```text
//!   ID      Health Status  Running Status
//!   ------  -------------  --------------
//!   CTE0.0  Normal         Online
//! ```
//!
//! Each word of a header or data line belongs to the column in which it
//! starts, so cells that drift a little relative to the dashes and values
//! containing single spaces are both handled.

use crate::domain::model::{Record, Table};
use tracing::debug;

// =============================================================================
// Constants
// =============================================================================

/// Line prefixes skipped as separators or echoed commands
pub const DEFAULT_IGNORED_PREFIXES: &[&str] = &["-", "#show"];

// =============================================================================
// Column Layout
// =============================================================================

/// Column boundaries discovered from a separator line
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnLayout {
    /// Exclusive end (in chars) of each dash run; the last column is open-ended
    run_ends: Vec<usize>,
}

impl ColumnLayout {
    fn from_separator(line: &str) -> Option<Self> {
        let run_ends: Vec<usize> = words(line).map(|w| w.char_end).collect();
        if run_ends.is_empty() {
            None
        } else {
            Some(Self { run_ends })
        }
    }

    fn columns(&self) -> usize {
        self.run_ends.len()
    }

    fn column_of(&self, char_start: usize) -> usize {
        let preceding = self.run_ends.iter().filter(|end| **end <= char_start).count();
        preceding.min(self.columns() - 1)
    }

    /// Slice a line into one cell per column
    fn cells(&self, line: &str) -> Vec<String> {
        let mut spans: Vec<Option<(usize, usize)>> = vec![None; self.columns()];
        for word in words(line) {
            let column = self.column_of(word.char_start);
            spans[column] = Some(match spans[column] {
                Some((start, _)) => (start, word.byte_end),
                None => (word.byte_start, word.byte_end),
            });
        }
        spans
            .into_iter()
            .map(|span| span.map(|(s, e)| line[s..e].to_string()).unwrap_or_default())
            .collect()
    }
}

/// One whitespace-delimited word with char and byte positions
struct Word {
    char_start: usize,
    char_end: usize,
    byte_start: usize,
    byte_end: usize,
}

fn words(line: &str) -> impl Iterator<Item = Word> + '_ {
    let mut chars = line.char_indices().enumerate().peekable();
    std::iter::from_fn(move || {
        while let Some((_, (_, c))) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
            } else {
                break;
            }
        }
        let (char_start, (byte_start, _)) = chars.next()?;
        let mut char_end = char_start + 1;
        let mut byte_end = line.len();
        while let Some((i, (b, c))) = chars.peek() {
            if c.is_whitespace() {
                byte_end = *b;
                break;
            }
            char_end = *i + 1;
            chars.next();
        }
        Some(Word {
            char_start,
            char_end,
            byte_start,
            byte_end,
        })
    })
}

fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == '-' || c.is_whitespace())
}

// =============================================================================
// Table Parser
// =============================================================================

/// Parses fixed-width listings keyed by the first column
#[derive(Debug, Clone)]
pub struct TableParser {
    key_prefix: String,
    ignored_prefixes: Vec<String>,
}

impl TableParser {
    /// Create a parser whose header line starts with `key_prefix`
    pub fn new(key_prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            ignored_prefixes: DEFAULT_IGNORED_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Skip data lines starting with `prefix` as well
    pub fn ignore_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ignored_prefixes.push(prefix.into());
        self
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Parse a listing; unsupported or empty responses yield an empty table
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Table {
        let Some(layout) = lines
            .iter()
            .rev()
            .map(|line| line.as_ref())
            .find(|line| is_separator(line))
            .and_then(ColumnLayout::from_separator)
        else {
            debug!(key = %self.key_prefix, "No separator line, returning empty table");
            return Table::new();
        };

        let Some(header_index) = lines
            .iter()
            .position(|line| line.as_ref().trim().starts_with(&self.key_prefix))
        else {
            debug!(key = %self.key_prefix, "No header line, returning empty table");
            return Table::new();
        };

        let header = layout.cells(lines[header_index].as_ref());
        let mut table = Table::with_fields(header.iter().filter(|f| !f.is_empty()).cloned());

        for line in &lines[header_index + 1..] {
            let line = line.as_ref();
            if !self.is_data_line(line) {
                continue;
            }

            let mut values = layout.cells(line);
            while values.last().is_some_and(|v| v.is_empty()) {
                values.pop();
            }
            let Some(key) = values.first().filter(|k| !k.is_empty()).cloned() else {
                continue;
            };

            let record: Record = header
                .iter()
                .zip(values)
                .filter(|(field, _)| !field.is_empty())
                .map(|(field, value)| (field.clone(), value))
                .collect();
            table.merge_record(key, record);
        }

        table
    }

    fn is_data_line(&self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_separator(line) || trimmed.starts_with(&self.key_prefix) {
            return false;
        }
        !self
            .ignored_prefixes
            .iter()
            .any(|prefix| trimmed.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISKS: &[&str] = &[
        "",
        "  ID      Health Status  Running Status  Type  Capacity   Role         Disk Domain ID",
        "  ------  -------------  --------------  ----  ---------  -----------  --------------",
        "  CTE0.0  Normal         Online          SAS   557.861GB  Member Disk  0",
        "  CTE0.1  Fault          Offline         SAS   557.861GB  Hot Spare",
        "",
    ];

    #[test]
    fn test_parse_misaligned_header() {
        let lines = [
            "ID   Health Status   Running Status",
            "--  -------------  --------------",
            "1   Normal         Online        ",
        ];
        let table = TableParser::new("ID").parse(&lines);

        assert_eq!(table.len(), 1);
        let record = table.get("1").unwrap();
        assert_eq!(record.get("ID"), Some("1"));
        assert_eq!(record.get("Health Status"), Some("Normal"));
        assert_eq!(record.get("Running Status"), Some("Online"));
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_parse_indented_listing() {
        let table = TableParser::new("ID").parse(DISKS);

        assert_eq!(
            table.fields(),
            &[
                "ID",
                "Health Status",
                "Running Status",
                "Type",
                "Capacity",
                "Role",
                "Disk Domain ID"
            ]
        );
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["CTE0.0", "CTE0.1"]);
        assert_eq!(table.get("CTE0.0").unwrap().get("Role"), Some("Member Disk"));
        assert_eq!(table.get("CTE0.0").unwrap().get("Disk Domain ID"), Some("0"));
    }

    #[test]
    fn test_ragged_row_omits_trailing_fields() {
        let table = TableParser::new("ID").parse(DISKS);
        let spare = table.get("CTE0.1").unwrap();

        assert_eq!(spare.get("Role"), Some("Hot Spare"));
        assert!(!spare.contains("Disk Domain ID"));
    }

    #[test]
    fn test_no_separator_is_empty() {
        let lines = ["Error: command not supported.", "ID  Health Status"];
        assert!(TableParser::new("ID").parse(&lines).is_empty());
        assert!(TableParser::new("ID").parse::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_skips_repeated_header_and_ignored_lines() {
        let lines = [
            "  Sequence  Level  Occurred On          Name",
            "  --------  -----  -------------------  ------------------",
            "  101       Major  2023-04-01/10:00:00  The BBU is faulty",
            "#show alarm",
            "  Sequence  Level  Occurred On          Name",
            "  --------  -----  -------------------  ------------------",
            "  102       Minor  2023-04-02/11:30:00  Link down",
        ];
        let table = TableParser::new("Sequence").parse(&lines);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("101").unwrap().get("Name"), Some("The BBU is faulty"));
        assert_eq!(
            table.get("102").unwrap().get("Occurred On"),
            Some("2023-04-02/11:30:00")
        );
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = TableParser::new("ID");
        assert_eq!(parser.parse(DISKS), parser.parse(DISKS));
    }

    #[test]
    fn test_extra_ignored_prefix() {
        let lines = [
            "ID  Health Status",
            "--  -------------",
            "1   Normal",
            "Command executed successfully.",
        ];
        let table = TableParser::new("ID").ignore_prefix("Command").parse(&lines);
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["1"]);
    }
}
