//! Port Decoders
//!
//! `switchshow`, `portshow` and `sfpshow` output merged into the port
//! table, keyed by port index. Slot/port references from blade chassis
//! are resolved through the rows `switchshow` already produced.

use crate::domain::model::{Record, Table};
use crate::health::thresholds::dbm_to_microwatts;
use crate::state::fields::{port, switch};
use crate::state::{Category, ContextState};
use tracing::debug;

/// Transceiver readings kept from `sfpshow`
pub const TRANSCEIVER_FIELDS: &[&str] = &[
    port::TEMPERATURE,
    port::CURRENT,
    port::VOLTAGE,
    port::RX_POWER,
    port::TX_POWER,
];

const CONNECTED_MARKER: &str = "portWwn of device(s) connected:";
const CONNECTED_END_MARKERS: &[&str] = &["16b Area list:", "Distance:"];
const PHYS_MARKER: &str = "portPhys:";
const SCN_MARKER: &str = "portScn:";
const GENERATION_MARKER: &str = "port generation number:";

pub(crate) fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// switchshow
// =============================================================================

/// Decode `switchshow`: switch attributes plus one row per port
pub fn decode_switchshow<S: AsRef<str>>(lines: &[S], state: &mut ContextState) {
    let mut blade = false;
    let mut ports = 0usize;

    for line in lines {
        let line = line.as_ref().trim();
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            continue;
        };

        if *first == "Index" {
            blade = tokens.get(1) == Some(&"Slot");
            continue;
        }

        if is_numeric(first) {
            if let Some(record) = port_row(&tokens, blade) {
                state.table_mut(Category::Port).merge_record(*first, record);
                ports += 1;
            }
            continue;
        }

        if let Some((label, value)) = line.split_once(':') {
            let label = label.trim();
            if !label.is_empty() {
                state.record_mut(Category::Switch).insert(label, value.trim());
            }
        }
    }

    debug!(ports, blade, "Decoded switchshow");
}

fn port_row(tokens: &[&str], blade: bool) -> Option<Record> {
    // Seven tokens in either layout; Proto may be empty
    let (slot, rest) = if blade {
        if tokens.len() < 7 {
            return None;
        }
        (tokens[1], &tokens[2..])
    } else {
        if tokens.len() < 7 {
            return None;
        }
        ("N/A", &tokens[1..])
    };

    let mut record = Record::new();
    record.insert(port::INDEX, tokens[0]);
    record.insert(port::SLOT, slot);
    record.insert(port::PORT, rest[0]);
    record.insert(port::ADDRESS, rest[1]);
    record.insert(port::MEDIA, rest[2]);
    record.insert(port::SPEED, rest[3]);
    record.insert(port::STATE, rest[4]);
    record.insert(port::PROTO, rest[5..].join(" "));
    Some(record)
}

// =============================================================================
// portshow
// =============================================================================

/// Decode one `portshow <port>` buffer
pub fn decode_portshow<S: AsRef<str>>(lines: &[S], state: &mut ContextState) {
    let mut record = Record::new();

    for line in lines {
        let line = line.as_ref();
        let parts: Vec<&str> = line.split(": ").collect();
        match parts.len() {
            2 => {
                let label = parts[0].trim();
                if !label.is_empty() {
                    record.insert(label, parts[1].trim());
                }
            }
            n if n > 2 => dense_pairs(line, &mut record),
            _ => {}
        }
    }

    let text = lines
        .iter()
        .flat_map(|l| l.as_ref().split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(connected) = between(&text, CONNECTED_MARKER, CONNECTED_END_MARKERS) {
        record.insert(port::CONNECTED, connected);
    }
    if let Some(phys) = between(&text, PHYS_MARKER, &[SCN_MARKER]) {
        record.insert(port::PHYS, phys);
    }
    if let Some(scn) = between(&text, SCN_MARKER, &[GENERATION_MARKER]) {
        record.insert(port::SCN, scn);
    }

    let Some(index) = record.get(port::PORT_INDEX).map(str::to_string) else {
        debug!("portshow buffer without portIndex, ignored");
        return;
    };
    state.table_mut(Category::Port).merge_record(index, record);
}

/// Lines packing several `label: value` pairs; each `label:` token takes
/// the token that follows it
fn dense_pairs(line: &str, record: &mut Record) {
    let mut tokens = line.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        let Some(label) = token.strip_suffix(':') else {
            continue;
        };
        if label.is_empty() || label.contains(':') {
            continue;
        }
        if let Some(value) = tokens.next_if(|t| !t.ends_with(':')) {
            record.insert(label, value);
        }
    }
}

/// Text after `start`, cut at the earliest end marker (or end of text)
fn between(text: &str, start: &str, ends: &[&str]) -> Option<String> {
    let (_, after) = text.split_once(start)?;
    let cut = ends
        .iter()
        .filter_map(|end| after.find(end))
        .min()
        .unwrap_or(after.len());
    Some(after[..cut].trim().to_string())
}

// =============================================================================
// Port references
// =============================================================================

/// A port as named by `sfpshow`: plain index or blade slot/port
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortRef {
    Index(String),
    SlotPort { slot: String, port: String },
}

impl PortRef {
    /// Parse a command argument: `5` or `1/0`
    pub fn parse(arg: &str) -> Option<Self> {
        let arg = arg.trim();
        match arg.split_once('/') {
            Some((slot, port)) if is_numeric(slot.trim()) && is_numeric(port.trim()) => {
                Some(PortRef::SlotPort {
                    slot: slot.trim().to_string(),
                    port: port.trim().to_string(),
                })
            }
            None if is_numeric(arg) => Some(PortRef::Index(arg.to_string())),
            _ => None,
        }
    }

    /// Parse a section header: `Port 5:` or `Slot 1/Port 0:`
    pub fn parse_header(line: &str) -> Option<Self> {
        let body = line.trim().strip_suffix(':')?;
        if let Some(rest) = body.strip_prefix("Slot") {
            let (slot, port) = rest.split_once('/')?;
            let port = port.trim().strip_prefix("Port")?;
            return PortRef::parse(&format!("{}/{}", slot.trim(), port.trim()));
        }
        let index = body.strip_prefix("Port")?;
        PortRef::parse(index)
    }

    /// Port table key; unresolvable slot/port pairs keep their `s/p` form
    pub fn resolve(&self, ports: Option<&Table>) -> String {
        match self {
            PortRef::Index(index) => index.clone(),
            PortRef::SlotPort { slot, port: number } => ports
                .and_then(|t| t.find_key(&[(port::SLOT, slot.as_str()), (port::PORT, number.as_str())]))
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}/{}", slot, number)),
        }
    }
}

// =============================================================================
// sfpshow
// =============================================================================

/// Normalize a transceiver reading: `-3.0 dBm` becomes microwatts at one
/// decimal, other units keep the bare number. Non-numeric input is `None`.
pub fn transceiver_reading(raw: &str) -> Option<String> {
    let mut tokens = raw.split_whitespace();
    let number = tokens.next()?;
    let value = number.parse::<f64>().ok().filter(|v| v.is_finite())?;
    match tokens.next() {
        Some("dBm") => Some(format!("{:.1}", dbm_to_microwatts(value))),
        _ => Some(number.to_string()),
    }
}

fn merge_reading(record: &mut Record, label: &str, raw: &str) {
    match transceiver_reading(raw) {
        Some(value) => record.insert(label, value),
        None => debug!(field = label, value = raw, "Skipping non-numeric reading"),
    }
}

/// Decode `sfpshow -all`: whitelisted readings for every port section
pub fn decode_sfpshow_all<S: AsRef<str>>(lines: &[S], state: &mut ContextState) {
    let mut current: Option<(String, Record)> = None;

    for line in lines {
        let line = line.as_ref().trim();
        if let Some(port_ref) = PortRef::parse_header(line) {
            flush_reading(state, current.take());
            let key = port_ref.resolve(state.table(Category::Port));
            current = Some((key, Record::new()));
            continue;
        }

        let Some((_, record)) = current.as_mut() else {
            continue;
        };
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let label = label.trim();
        if TRANSCEIVER_FIELDS.contains(&label) {
            merge_reading(record, label, value);
        }
    }
    flush_reading(state, current);
}

fn flush_reading(state: &mut ContextState, current: Option<(String, Record)>) {
    if let Some((key, record)) = current {
        if !record.is_empty() {
            state.table_mut(Category::Port).merge_record(key, record);
        }
    }
}

/// Decode `sfpshow <port>`: every labelled line, readings normalized
pub fn decode_sfpshow_port<S: AsRef<str>>(arg: &str, lines: &[S], state: &mut ContextState) {
    let Some(port_ref) = PortRef::parse(arg) else {
        debug!(arg, "sfpshow argument is not a port reference");
        return;
    };
    let key = port_ref.resolve(state.table(Category::Port));

    let mut record = Record::new();
    for line in lines {
        let Some((label, value)) = line.as_ref().split_once(':') else {
            continue;
        };
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        if TRANSCEIVER_FIELDS.contains(&label) {
            merge_reading(&mut record, label, value);
        } else {
            record.insert(label, value.trim());
        }
    }

    if !record.is_empty() {
        state.table_mut(Category::Port).merge_record(key, record);
    }
}

/// Switch name, for log context
pub fn switch_name(state: &ContextState) -> Option<&str> {
    state.record(Category::Switch).and_then(|r| r.get(switch::NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWITCHSHOW: &[&str] = &[
        "switchName:\tSW01",
        "switchType:\t71.2",
        "switchState:\tOnline",
        "switchDomain:\t1",
        "switchWwn:\t10:00:00:05:1e:00:00:01",
        "zoning:\t\tON (cfg_prod)",
        "Index Port Address  Media Speed State       Proto",
        "==================================================",
        "0   0   010000   id    N8   Online      FC  F-Port  50:05:07:68:01:40:00:01",
        "1   1   010100   --    N8   No_Module   FC",
        "2   2   010200",
    ];

    const BLADE_SWITCHSHOW: &[&str] = &[
        "switchName:\tDCX01",
        "Index Slot Port Address Media  Speed  State     Proto",
        "=======================================================",
        "0    1    0   010000   id    N16    Online    FC  F-Port  50:05:07:68:01:40:00:01",
        "16   2    0   011000   id    N16    Online    FC",
        "17   2    1   011100   id    N8     No_Light",
        "18   2    2   011200   id    N8",
    ];

    #[test]
    fn test_switchshow_non_blade() {
        let mut state = ContextState::default();
        decode_switchshow(SWITCHSHOW, &mut state);

        let switch = state.record(Category::Switch).unwrap();
        assert_eq!(switch.get("switchName"), Some("SW01"));
        assert_eq!(switch.get("switchWwn"), Some("10:00:00:05:1e:00:00:01"));
        assert_eq!(switch.get("zoning"), Some("ON (cfg_prod)"));
        assert_eq!(switch_name(&state), Some("SW01"));

        let ports = state.table(Category::Port).unwrap();
        assert_eq!(ports.len(), 2);
        let p0 = ports.get("0").unwrap();
        assert_eq!(p0.get("Slot"), Some("N/A"));
        assert_eq!(p0.get("State"), Some("Online"));
        assert_eq!(p0.get("Proto"), Some("FC F-Port 50:05:07:68:01:40:00:01"));
        assert_eq!(ports.get("1").unwrap().get("Proto"), Some("FC"));
    }

    #[test]
    fn test_switchshow_blade() {
        let mut state = ContextState::default();
        decode_switchshow(BLADE_SWITCHSHOW, &mut state);

        let ports = state.table(Category::Port).unwrap();
        assert_eq!(ports.keys().collect::<Vec<_>>(), vec!["0", "16", "17"]);
        let p16 = ports.get("16").unwrap();
        assert_eq!(p16.get("Slot"), Some("2"));
        assert_eq!(p16.get("Port"), Some("0"));
        assert_eq!(p16.get("Address"), Some("011000"));
        assert_eq!(p16.get("Proto"), Some("FC"));

        let p17 = ports.get("17").unwrap();
        assert_eq!(p17.get("Port"), Some("1"));
        assert_eq!(p17.get("State"), Some("No_Light"));
        assert_eq!(p17.get("Proto"), Some(""));
    }

    #[test]
    fn test_portshow() {
        let lines = [
            "portIndex:   0",
            "portName: port0",
            "portHealth: HEALTHY",
            "portState: 1    Online",
            "portPhys:  6    In_Sync         portScn:   32   F_Port",
            "port generation number:    148",
            "portId:    010000 portIfId:    43020008",
            "portWwn:   20:00:00:05:1e:00:00:01",
            "portWwn of device(s) connected:",
            "        50:05:07:68:01:40:00:01",
            "        50:05:07:68:01:40:00:02",
            "Distance:  normal",
        ];
        let mut state = ContextState::default();
        decode_portshow(&lines, &mut state);

        let p0 = state.table(Category::Port).unwrap().get("0").unwrap();
        assert_eq!(p0.get("portName"), Some("port0"));
        assert_eq!(p0.get("portWwn"), Some("20:00:00:05:1e:00:00:01"));
        assert_eq!(p0.get("portId"), Some("010000"));
        assert_eq!(p0.get("portIfId"), Some("43020008"));
        assert_eq!(p0.get("portPhys"), Some("6 In_Sync"));
        assert_eq!(p0.get("portScn"), Some("32 F_Port"));
        assert_eq!(
            p0.get("portWwn of device(s) connected"),
            Some("50:05:07:68:01:40:00:01 50:05:07:68:01:40:00:02")
        );
    }

    #[test]
    fn test_portshow_without_index_ignored() {
        let mut state = ContextState::default();
        decode_portshow(&["portName: orphan"], &mut state);
        assert!(state.table(Category::Port).is_none());
    }

    #[test]
    fn test_portshow_merges_with_switchshow() {
        let mut state = ContextState::default();
        decode_switchshow(SWITCHSHOW, &mut state);
        decode_portshow(&["portIndex: 1", "portHealth: No Fabric"], &mut state);

        let p1 = state.table(Category::Port).unwrap().get("1").unwrap();
        assert_eq!(p1.get("State"), Some("No_Module"));
        assert_eq!(p1.get("portHealth"), Some("No Fabric"));
    }

    #[test]
    fn test_port_ref_parsing() {
        assert_eq!(PortRef::parse("5"), Some(PortRef::Index("5".into())));
        assert_eq!(
            PortRef::parse_header("Slot  2/Port  1:"),
            Some(PortRef::SlotPort { slot: "2".into(), port: "1".into() })
        );
        assert_eq!(PortRef::parse_header("Port  12:"), Some(PortRef::Index("12".into())));
        assert_eq!(PortRef::parse_header("Identifier:  3    SFP"), None);
        assert_eq!(PortRef::parse("-all"), None);
    }

    #[test]
    fn test_transceiver_reading() {
        assert_eq!(transceiver_reading(" 36      Centigrade").as_deref(), Some("36"));
        assert_eq!(transceiver_reading("-3.0 dBm (501.2 uW)").as_deref(), Some("501.2"));
        assert_eq!(transceiver_reading("N/A"), None);
        assert_eq!(transceiver_reading(""), None);
    }

    #[test]
    fn test_sfpshow_all_blade_resolution() {
        let mut state = ContextState::default();
        decode_switchshow(BLADE_SWITCHSHOW, &mut state);
        let lines = [
            "Slot  2/Port  0:",
            "=============",
            "Identifier:  3    SFP",
            "Temperature: 36      Centigrade",
            "Current:     7.248   mAmps",
            "Voltage:     3301.6  mVolts",
            "RX Power:    -3.0    dBm (501.2 uW)",
            "TX Power:    N/A",
            "Slot  9/Port  9:",
            "Temperature: 40      Centigrade",
        ];
        decode_sfpshow_all(&lines, &mut state);

        let ports = state.table(Category::Port).unwrap();
        let p16 = ports.get("16").unwrap();
        assert_eq!(p16.get("Temperature"), Some("36"));
        assert_eq!(p16.get("Current"), Some("7.248"));
        assert_eq!(p16.get("RX Power"), Some("501.2"));
        assert_eq!(p16.get("TX Power"), None);
        assert_eq!(p16.get("Identifier"), None);
        assert_eq!(p16.get("State"), Some("Online"));
        assert_eq!(ports.get("9/9").unwrap().get("Temperature"), Some("40"));
    }

    #[test]
    fn test_sfpshow_single_port() {
        let mut state = ContextState::default();
        decode_switchshow(BLADE_SWITCHSHOW, &mut state);
        let lines = [
            "Identifier:  3    SFP",
            "Vendor Name: BROCADE",
            "Temperature: 36      Centigrade",
            "TX Power:    -2.4    dBm (575.4 uW)",
        ];
        decode_sfpshow_port("1/0", &lines, &mut state);

        let p0 = state.table(Category::Port).unwrap().get("0").unwrap();
        assert_eq!(p0.get("Vendor Name"), Some("BROCADE"));
        assert_eq!(p0.get("Temperature"), Some("36"));
        assert_eq!(p0.get("TX Power"), Some("575.4"));
        assert_eq!(p0.get("Index"), Some("0"));
    }
}
