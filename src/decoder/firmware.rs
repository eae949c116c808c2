//! Firmware Decoder
//!
//! `firmwareshow` prints each primary version on the row itself and the
//! secondary version alone on the following line:
//!
//! ```text
//! Slot Name Appl Primary/Secondary Versions      Status
//! ------------------------------------------------------
//!   6  CP0  FOS  v7.4.2a                         STANDBY
//!                v7.4.2a
//! ```
//!
//! Non-director switches print `FOS <primary>` rows instead, keyed `FOS`.

use super::port::is_numeric;
use crate::domain::model::Record;
use crate::state::fields::firmware;
use crate::state::{Category, ContextState};
use tracing::debug;

/// Forward cursor with one line of look-ahead
struct LineCursor<'a, S> {
    lines: &'a [S],
    pos: usize,
}

impl<'a, S: AsRef<str>> LineCursor<'a, S> {
    fn new(lines: &'a [S]) -> Self {
        Self { lines, pos: 0 }
    }

    fn next(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.pos)?;
        self.pos += 1;
        Some(line.as_ref())
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(|line| line.as_ref())
    }
}

/// Decode `firmwareshow`, one record per slot
pub fn decode_firmwareshow<S: AsRef<str>>(lines: &[S], state: &mut ContextState) {
    let mut cursor = LineCursor::new(lines);

    while let Some(line) = cursor.next() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (key, mut record, status) = match tokens.as_slice() {
            [appl, primary, status @ ..] if *appl == firmware::FOS_KEY => {
                let mut record = Record::new();
                record.insert(firmware::APPL, *appl);
                record.insert(firmware::PRIMARY, *primary);
                (firmware::FOS_KEY.to_string(), record, status.join(" "))
            }
            [slot, name, appl, primary, status @ ..] if is_numeric(slot) => {
                let mut record = Record::new();
                record.insert(firmware::SLOT, *slot);
                record.insert(firmware::NAME, *name);
                record.insert(firmware::APPL, *appl);
                record.insert(firmware::PRIMARY, *primary);
                (slot.to_string(), record, status.join(" "))
            }
            _ => continue,
        };

        match cursor.peek().map(|l| l.split_whitespace().collect::<Vec<_>>()) {
            Some(next) if next.len() == 1 => {
                record.insert(firmware::SECONDARY, next[0]);
                cursor.next();
            }
            _ => debug!(slot = %key, "Firmware row without secondary version"),
        }
        if !status.is_empty() {
            record.insert(firmware::STATUS, status);
        }

        state.table_mut(Category::Firmware).merge_record(key, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_director_firmware_keeps_every_slot() {
        let lines = [
            "Slot Name Appl Primary/Secondary Versions      Status",
            "------------------------------------------------------",
            "  6  CP0  FOS  v7.4.2a                         STANDBY",
            "               v7.4.2a",
            "  7  CP1  FOS  v7.4.2a                         ACTIVE *",
            "               v7.4.1",
        ];
        let mut state = ContextState::default();
        decode_firmwareshow(&lines, &mut state);

        let table = state.table(Category::Firmware).unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["6", "7"]);
        let cp1 = table.get("7").unwrap();
        assert_eq!(cp1.get("Name"), Some("CP1"));
        assert_eq!(cp1.get("Secondary"), Some("v7.4.1"));
        assert_eq!(cp1.get("Status"), Some("ACTIVE *"));
    }

    #[test]
    fn test_fos_row() {
        let lines = [
            "Appl     Primary/Secondary Versions",
            "------------------------------------------",
            "FOS      v8.2.1c",
            "         v8.2.1c",
        ];
        let mut state = ContextState::default();
        decode_firmwareshow(&lines, &mut state);

        let fos = state.table(Category::Firmware).unwrap().get("FOS").unwrap();
        assert_eq!(fos.get("Primary"), Some("v8.2.1c"));
        assert_eq!(fos.get("Secondary"), Some("v8.2.1c"));
        assert_eq!(fos.get("Status"), None);
    }

    #[test]
    fn test_missing_continuation_keeps_partial_record() {
        let lines = ["  6  CP0  FOS  v7.4.2a  ACTIVE"];
        let mut state = ContextState::default();
        decode_firmwareshow(&lines, &mut state);

        let cp0 = state.table(Category::Firmware).unwrap().get("6").unwrap();
        assert_eq!(cp0.get("Primary"), Some("v7.4.2a"));
        assert_eq!(cp0.get("Secondary"), None);
    }
}
