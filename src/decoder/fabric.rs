//! Fabric and management-network decoders

use super::port::is_numeric;
use crate::domain::model::Record;
use crate::state::fields::{fabric, ip};
use crate::state::{Category, ContextState};
use tracing::debug;

/// Section headers of `ipaddrshow`
pub const IP_SECTIONS: &[&str] = &["CHASSIS", "CP0", "CP1", "SWITCH"];

/// `ipaddrshow` labels and the fields they fill
const IP_LABELS: &[(&str, &str)] = &[
    ("Ethernet IP Address", ip::IP),
    ("Ethernet Subnetmask", ip::NETMASK),
    ("Gateway IP Address", ip::GATEWAY),
    ("Host Name", ip::HOSTNAME),
];

/// Decode `fabricshow`: one row per fabric member, keyed by switch number.
///
/// ```text
///   1: fffc01 10:00:00:05:1e:00:00:01 10.1.1.1   0.0.0.0   >"SW01"
/// ```
///
/// A leading `>` on the name marks the principal switch.
pub fn decode_fabricshow<S: AsRef<str>>(lines: &[S], state: &mut ContextState) {
    for line in lines {
        let tokens: Vec<&str> = line.as_ref().split_whitespace().collect();
        if tokens.len() < 5 {
            continue;
        }
        let Some(switch) = tokens[0].strip_suffix(':').filter(|s| is_numeric(s)) else {
            continue;
        };

        let last = tokens[tokens.len() - 1];
        let mut record = Record::new();
        record.insert(fabric::SWITCH, switch);
        record.insert(fabric::ID, tokens[1]);
        record.insert(fabric::WWN, tokens[2]);
        record.insert(fabric::IP, tokens[3]);
        record.insert(fabric::NAME, last.trim_matches(|c| c == '>' || c == '"'));
        record.insert(
            fabric::PRINCIPAL,
            if last.starts_with('>') { "yes" } else { "no" },
        );
        state
            .table_mut(Category::Fabric)
            .merge_record(switch, record);
    }
}

/// Decode `ipaddrshow`: each section header opens a new record.
///
/// A repeated header reopens the record of that section; later values
/// replace earlier ones.
pub fn decode_ipaddrshow<S: AsRef<str>>(lines: &[S], state: &mut ContextState) {
    let mut section = "SWITCH".to_string();
    let mut seen: Vec<&str> = Vec::new();

    for line in lines {
        let line = line.as_ref().trim();
        if let Some(header) = IP_SECTIONS.iter().find(|s| **s == line) {
            if seen.contains(header) {
                debug!(section = *header, "Repeated ipaddrshow section, merging");
            } else {
                seen.push(*header);
            }
            section = line.to_string();
            state
                .table_mut(Category::IpAddress)
                .set(&section, ip::SECTION, line);
            continue;
        }

        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let label = label.trim();
        if let Some((_, field)) = IP_LABELS.iter().find(|(l, _)| *l == label) {
            let table = state.table_mut(Category::IpAddress);
            table.set(&section, ip::SECTION, section.as_str());
            table.set(&section, field, value.trim());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fabricshow() {
        let lines = [
            "Switch ID   Worldwide Name           Enet IP Addr    FC IP Addr      Name",
            "-------------------------------------------------------------------------",
            "  1: fffc01 10:00:00:05:1e:00:00:01 10.1.1.1        0.0.0.0        >\"SW01\"",
            "  2: fffc02 10:00:00:05:1e:00:00:02 10.1.1.2        0.0.0.0         \"SW02\"",
            "The Fabric has 2 switches",
        ];
        let mut state = ContextState::default();
        decode_fabricshow(&lines, &mut state);

        let table = state.table(Category::Fabric).unwrap();
        assert_eq!(table.len(), 2);
        let sw1 = table.get("1").unwrap();
        assert_eq!(sw1.get("Name"), Some("SW01"));
        assert_eq!(sw1.get("Principal"), Some("yes"));
        assert_eq!(sw1.get("IP"), Some("10.1.1.1"));
        assert_eq!(table.get("2").unwrap().get("Principal"), Some("no"));
    }

    #[test]
    fn test_ipaddrshow_sections() {
        let lines = [
            "CHASSIS",
            "Ethernet IP Address: 10.1.1.10",
            "Ethernet Subnetmask: 255.255.255.0",
            "CP0",
            "Ethernet IP Address: 10.1.1.11",
            "Host Name: cp0",
            "Gateway IP Address: 10.1.1.254",
            "CP1",
            "Ethernet IP Address: 10.1.1.12",
            "DHCP: Off",
        ];
        let mut state = ContextState::default();
        decode_ipaddrshow(&lines, &mut state);

        let table = state.table(Category::IpAddress).unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["CHASSIS", "CP0", "CP1"]);
        assert_eq!(table.get("CHASSIS").unwrap().get("Netmask"), Some("255.255.255.0"));
        let cp0 = table.get("CP0").unwrap();
        assert_eq!(cp0.get("IP"), Some("10.1.1.11"));
        assert_eq!(cp0.get("Hostname"), Some("cp0"));
        assert_eq!(cp0.get("Gateway"), Some("10.1.1.254"));
        assert_eq!(table.get("CP1").unwrap().get("IP"), Some("10.1.1.12"));
    }

    #[test]
    fn test_ipaddrshow_repeated_section_merges() {
        let lines = [
            "CP0",
            "Ethernet IP Address: 10.1.1.11",
            "Host Name: cp0",
            "CP0",
            "Ethernet IP Address: 10.1.1.12",
        ];
        let mut state = ContextState::default();
        decode_ipaddrshow(&lines, &mut state);

        let table = state.table(Category::IpAddress).unwrap();
        assert_eq!(table.len(), 1);
        let cp0 = table.get("CP0").unwrap();
        assert_eq!(cp0.get("IP"), Some("10.1.1.12"));
        assert_eq!(cp0.get("Hostname"), Some("cp0"));
    }

    #[test]
    fn test_ipaddrshow_without_header() {
        let lines = ["Ethernet IP Address: 10.9.9.9"];
        let mut state = ContextState::default();
        decode_ipaddrshow(&lines, &mut state);

        let switch = state.table(Category::IpAddress).unwrap().get("SWITCH").unwrap();
        assert_eq!(switch.get("IP"), Some("10.9.9.9"));
    }
}
