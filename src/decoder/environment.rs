//! Environment Decoders
//!
//! Fixed-position tokenization of the temperature, sensor, fan, power
//! supply and slot listings. Rows without the expected id token are
//! skipped.

use super::port::is_numeric;
use crate::domain::model::Record;
use crate::state::fields::{env, slot};
use crate::state::{Category, ContextState};
use tracing::debug;

fn merge(state: &mut ContextState, category: Category, id: &str, record: Record) {
    state.table_mut(category).merge_record(id, record);
}

/// Decode `tempshow`: `<id> ... <state> <centigrade> <fahrenheit>`
pub fn decode_tempshow<S: AsRef<str>>(lines: &[S], state: &mut ContextState) {
    for line in lines {
        let tokens: Vec<&str> = line.as_ref().split_whitespace().collect();
        if tokens.len() < 4 || !is_numeric(tokens[0]) {
            continue;
        }
        let n = tokens.len();
        let record: Record = [
            (env::ID, tokens[0]),
            (env::STATE, tokens[n - 3]),
            (env::CENTIGRADE, tokens[n - 2]),
            (env::FAHRENHEIT, tokens[n - 1]),
        ]
        .into_iter()
        .collect();
        merge(state, Category::Temperature, tokens[0], record);
    }
}

/// Decode `sensorshow`: `sensor <id>: (<type>) is <state>[, <label> is <value>]`
pub fn decode_sensorshow<S: AsRef<str>>(lines: &[S], state: &mut ContextState) {
    for line in lines {
        let line = line.as_ref().trim();
        match sensor_row(line) {
            Some((id, record)) => merge(state, Category::Sensor, &id, record),
            None if line.starts_with("sensor") => debug!(line, "Unparseable sensor line"),
            None => {}
        }
    }
}

fn sensor_row(line: &str) -> Option<(String, Record)> {
    let rest = line.strip_prefix("sensor")?;
    let (id, rest) = rest.split_once(':')?;
    let id = id.trim();
    if id.is_empty() {
        return None;
    }

    let (_, rest) = rest.split_once('(')?;
    let (kind, rest) = rest.split_once(')')?;
    let mut words = rest.split_whitespace();
    words.find(|w| *w == "is")?;
    let sensor_state = words.next()?.split(',').next().unwrap_or_default();

    let mut record = Record::new();
    record.insert(env::ID, id);
    record.insert(env::TYPE, kind.trim());
    record.insert(env::STATE, sensor_state);
    if rest.matches(" is ").count() >= 2 {
        if let Some((_, value)) = rest.rsplit_once(" is ") {
            record.insert(env::VALUE, value.trim());
        }
    }
    Some((id.to_string(), record))
}

/// Decode `fanshow`: `Fan <id> is <state>, speed is <rpm> RPM`
pub fn decode_fanshow<S: AsRef<str>>(lines: &[S], state: &mut ContextState) {
    for line in lines {
        let line = line.as_ref().trim();
        if !line.to_ascii_lowercase().starts_with("fan") {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 4 {
            continue;
        }

        let id = tokens[1];
        let mut record = Record::new();
        record.insert(env::ID, id);
        record.insert(env::STATE, tokens[3].trim_end_matches(','));
        if let Some((_, speed)) = line.split_once("speed is") {
            record.insert(env::SPEED, speed.trim());
        }
        merge(state, Category::Fan, id, record);
    }
}

/// Decode `psshow`: `Power Supply #<id> is <state>`
pub fn decode_psshow<S: AsRef<str>>(lines: &[S], state: &mut ContextState) {
    for line in lines {
        let line = line.as_ref().trim();
        if !line.starts_with("Power Supply") {
            continue;
        }
        let Some((_, after_hash)) = line.split_once('#') else {
            continue;
        };
        let id = after_hash.split_whitespace().next().unwrap_or_default();
        let Some((_, after_is)) = after_hash.split_once(" is ") else {
            continue;
        };
        let Some(ps_state) = after_is.split_whitespace().next() else {
            continue;
        };
        if id.is_empty() {
            continue;
        }

        let mut record = Record::new();
        record.insert(env::ID, id);
        record.insert(env::STATE, ps_state.trim_end_matches(','));
        merge(state, Category::Power, id, record);
    }
}

/// Decode `slotshow`: `<slot> <blade type...> [<id> [<model>]] <status>`
pub fn decode_slotshow<S: AsRef<str>>(lines: &[S], state: &mut ContextState) {
    for line in lines {
        let tokens: Vec<&str> = line.as_ref().split_whitespace().collect();
        if tokens.len() < 2 || !is_numeric(tokens[0]) {
            continue;
        }
        let last = tokens.len() - 1;

        let mut record = Record::new();
        record.insert(slot::SLOT, tokens[0]);
        match (1..last).find(|&i| is_numeric(tokens[i])) {
            Some(id_at) => {
                record.insert(slot::BLADE_TYPE, tokens[1..id_at].join(" "));
                record.insert(slot::ID, tokens[id_at]);
                if id_at + 1 < last {
                    record.insert(slot::MODEL, tokens[id_at + 1..last].join(" "));
                }
            }
            None => record.insert(slot::BLADE_TYPE, tokens[1..last].join(" ")),
        }
        record.insert(slot::STATUS, tokens[last]);
        merge(state, Category::Slot, tokens[0], record);
    }
}
