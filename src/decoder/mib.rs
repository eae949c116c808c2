//! MIB Decoders
//!
//! Turn grouped SNMP walks into the same store the CLI decoders fill.
//! Table columns are joined on the last instance arc; coded columns are
//! stored by their decoded name.

use crate::domain::model::Record;
use crate::domain::ports::MibDecoder;
use crate::health::codes::{
    decode_name, CpLastEvent, CpStatus, EventLevel, FruClass, FruStatus, HaStatus, PortAdminStatus,
    PortLinkState, PortOperStatus, PortPhysicalState, PortType, SensorStatus, SensorType,
    SwitchOperStatus,
};
use crate::parsing::WalkSet;
use crate::state::fields::{cp, env, event, fru, port, switch, xiv};
use crate::state::{Category, ContextState};
use tracing::debug;

/// Column OIDs
pub mod oid {
    // Brocade SW-MIB system group
    pub const FIRMWARE_VERSION: &str = "1.3.6.1.4.1.1588.2.1.1.1.1.6";
    pub const OPER_STATUS: &str = "1.3.6.1.4.1.1588.2.1.1.1.1.7";

    // Sensor table
    pub const SENSOR_INDEX: &str = "1.3.6.1.4.1.1588.2.1.1.1.1.22.1.1";
    pub const SENSOR_TYPE: &str = "1.3.6.1.4.1.1588.2.1.1.1.1.22.1.2";
    pub const SENSOR_STATUS: &str = "1.3.6.1.4.1.1588.2.1.1.1.1.22.1.3";
    pub const SENSOR_VALUE: &str = "1.3.6.1.4.1.1588.2.1.1.1.1.22.1.4";
    pub const SENSOR_INFO: &str = "1.3.6.1.4.1.1588.2.1.1.1.1.22.1.5";

    // FC port table
    pub const PORT_TYPE: &str = "1.3.6.1.4.1.1588.2.1.1.1.6.2.1.2";
    pub const PORT_PHY_STATE: &str = "1.3.6.1.4.1.1588.2.1.1.1.6.2.1.3";
    pub const PORT_OPER_STATUS: &str = "1.3.6.1.4.1.1588.2.1.1.1.6.2.1.4";
    pub const PORT_ADMIN_STATUS: &str = "1.3.6.1.4.1.1588.2.1.1.1.6.2.1.5";
    pub const PORT_LINK_STATE: &str = "1.3.6.1.4.1.1588.2.1.1.1.6.2.1.6";
    pub const PORT_NAME: &str = "1.3.6.1.4.1.1588.2.1.1.1.6.2.1.36";

    // SFP statistics
    pub const SFP_TEMPERATURE: &str = "1.3.6.1.4.1.1588.2.1.1.1.28.1.1.1";
    pub const SFP_VOLTAGE: &str = "1.3.6.1.4.1.1588.2.1.1.1.28.1.1.2";
    pub const SFP_CURRENT: &str = "1.3.6.1.4.1.1588.2.1.1.1.28.1.1.3";
    pub const SFP_RX_POWER: &str = "1.3.6.1.4.1.1588.2.1.1.1.28.1.1.4";
    pub const SFP_TX_POWER: &str = "1.3.6.1.4.1.1588.2.1.1.1.28.1.1.5";
    pub const SFP_POWER_ON_HOURS: &str = "1.3.6.1.4.1.1588.2.1.1.1.28.1.1.6";

    // Event log
    pub const EVENT_TIME: &str = "1.3.6.1.4.1.1588.2.1.1.1.8.5.1.2";
    pub const EVENT_LEVEL: &str = "1.3.6.1.4.1.1588.2.1.1.1.8.5.1.3";
    pub const EVENT_REPEAT: &str = "1.3.6.1.4.1.1588.2.1.1.1.8.5.1.4";
    pub const EVENT_DESCRIPTION: &str = "1.3.6.1.4.1.1588.2.1.1.1.8.5.1.5";
    pub const EVENT_VF_ID: &str = "1.3.6.1.4.1.1588.2.1.1.1.8.5.1.6";

    // High availability, FRUs and control processors
    pub const HA_STATUS: &str = "1.3.6.1.4.1.1588.2.1.2.1.1";
    pub const FRU_CLASS: &str = "1.3.6.1.4.1.1588.2.1.2.1.5.1.1";
    pub const FRU_STATUS: &str = "1.3.6.1.4.1.1588.2.1.2.1.5.1.2";
    pub const FRU_OBJECT_NUM: &str = "1.3.6.1.4.1.1588.2.1.2.1.5.1.3";
    pub const FRU_SUPPLIER_ID: &str = "1.3.6.1.4.1.1588.2.1.2.1.5.1.4";
    pub const FRU_SUPPLIER_PART: &str = "1.3.6.1.4.1.1588.2.1.2.1.5.1.5";
    pub const FRU_SUPPLIER_SERIAL: &str = "1.3.6.1.4.1.1588.2.1.2.1.5.1.6";
    pub const FRU_SUPPLIER_REVISION: &str = "1.3.6.1.4.1.1588.2.1.2.1.5.1.7";
    pub const FRU_POWER: &str = "1.3.6.1.4.1.1588.2.1.2.1.5.1.8";
    pub const CP_STATUS: &str = "1.3.6.1.4.1.1588.2.1.2.1.7.1.1";
    pub const CP_IP: &str = "1.3.6.1.4.1.1588.2.1.2.1.7.1.2";
    pub const CP_NETMASK: &str = "1.3.6.1.4.1.1588.2.1.2.1.7.1.3";
    pub const CP_GATEWAY: &str = "1.3.6.1.4.1.1588.2.1.2.1.7.1.4";
    pub const CP_LAST_EVENT: &str = "1.3.6.1.4.1.1588.2.1.2.1.7.1.5";

    // Huawei OceanStor event table
    pub const ARRAY_EVENT_DESCRIPTION: &str = "1.3.6.1.4.1.2011.2.251.20.1.1.1.1.4";
    pub const ARRAY_EVENT_DATE: &str = "1.3.6.1.4.1.2011.2.251.20.1.1.1.1.8";

    // IBM XIV-MIB, walked by name
    pub const XIV_FAILED_DISKS: &str = "xivFailedDisks";
    pub const XIV_MACHINE_STATUS: &str = "xivMachineStatus";
    pub const XIV_UTILIZATION_SOFT: &str = "xivUtilizationSoft";
    pub const XIV_UTILIZATION_HARD: &str = "xivUtilizationHard";
    pub const XIV_IF_STATUS: &str = "xivIfStatus";
}

/// Value MIB agents print for an unset string
const UNSET: &str = "-";

// =============================================================================
// Column mapping
// =============================================================================

/// One walked column and the field it fills
#[derive(Clone, Copy)]
pub struct ColumnSpec {
    pub oid: &'static str,
    pub field: &'static str,
    pub decode: Option<fn(&str) -> String>,
}

const fn raw(oid: &'static str, field: &'static str) -> ColumnSpec {
    ColumnSpec {
        oid,
        field,
        decode: None,
    }
}

const fn coded(oid: &'static str, field: &'static str, decode: fn(&str) -> String) -> ColumnSpec {
    ColumnSpec {
        oid,
        field,
        decode: Some(decode),
    }
}

/// Join columns on the instance index into one table
pub fn walk_table(walks: &WalkSet, columns: &[ColumnSpec], category: Category, state: &mut ContextState) {
    walk_table_head(walks, columns, category, state, usize::MAX);
}

/// Like [`walk_table`], keeping only the first `rows` values of each column
pub fn walk_table_head(
    walks: &WalkSet,
    columns: &[ColumnSpec],
    category: Category,
    state: &mut ContextState,
    rows: usize,
) {
    for column in columns {
        for (index, value) in walks.column(column.oid).into_iter().take(rows) {
            let value = match column.decode {
                Some(decode) => decode(&value),
                None => value,
            };
            state.table_mut(category).set(&index, column.field, value);
        }
    }
}

const SENSOR_COLUMNS: &[ColumnSpec] = &[
    raw(oid::SENSOR_INDEX, env::ID),
    coded(oid::SENSOR_TYPE, env::TYPE, decode_name::<SensorType>),
    coded(oid::SENSOR_STATUS, env::STATUS, decode_name::<SensorStatus>),
    raw(oid::SENSOR_VALUE, env::VALUE),
    raw(oid::SENSOR_INFO, env::INFO),
];

const PORT_COLUMNS: &[ColumnSpec] = &[
    raw(oid::PORT_NAME, port::NAME),
    coded(oid::PORT_TYPE, port::TYPE, decode_name::<PortType>),
    coded(oid::PORT_PHY_STATE, port::PHYSICAL_STATE, decode_name::<PortPhysicalState>),
    coded(oid::PORT_OPER_STATUS, port::OPER_STATUS, decode_name::<PortOperStatus>),
    coded(oid::PORT_ADMIN_STATUS, port::ADMIN_STATUS, decode_name::<PortAdminStatus>),
    coded(oid::PORT_LINK_STATE, port::LINK_STATE, decode_name::<PortLinkState>),
    raw(oid::SFP_TEMPERATURE, port::SFP_TEMPERATURE),
    raw(oid::SFP_VOLTAGE, port::SFP_VOLTAGE),
    raw(oid::SFP_CURRENT, port::SFP_CURRENT),
    raw(oid::SFP_RX_POWER, port::RX_POWER_DBM),
    raw(oid::SFP_TX_POWER, port::TX_POWER_DBM),
    raw(oid::SFP_POWER_ON_HOURS, port::POWER_ON_HOURS),
];

const EVENT_COLUMNS: &[ColumnSpec] = &[
    raw(oid::EVENT_TIME, event::TIME),
    coded(oid::EVENT_LEVEL, event::LEVEL, decode_name::<EventLevel>),
    raw(oid::EVENT_REPEAT, event::REPEAT),
    raw(oid::EVENT_DESCRIPTION, event::DESCRIPTION),
    raw(oid::EVENT_VF_ID, event::VF_ID),
];

const FRU_COLUMNS: &[ColumnSpec] = &[
    coded(oid::FRU_CLASS, fru::CLASS, decode_name::<FruClass>),
    coded(oid::FRU_STATUS, fru::STATUS, decode_name::<FruStatus>),
    raw(oid::FRU_OBJECT_NUM, fru::OBJECT_NUM),
    raw(oid::FRU_SUPPLIER_ID, fru::SUPPLIER_ID),
    raw(oid::FRU_SUPPLIER_PART, fru::SUPPLIER_PART),
    raw(oid::FRU_SUPPLIER_SERIAL, fru::SUPPLIER_SERIAL),
    raw(oid::FRU_SUPPLIER_REVISION, fru::SUPPLIER_REVISION),
    raw(oid::FRU_POWER, fru::POWER),
];

const CP_COLUMNS: &[ColumnSpec] = &[
    coded(oid::CP_STATUS, cp::STATUS, decode_name::<CpStatus>),
    raw(oid::CP_IP, cp::IP),
    raw(oid::CP_NETMASK, cp::NETMASK),
    raw(oid::CP_GATEWAY, cp::GATEWAY),
    coded(oid::CP_LAST_EVENT, cp::LAST_EVENT, decode_name::<CpLastEvent>),
];

/// Table groups of the switch MIB, events excluded
const SWITCH_TABLES: &[(Category, &[ColumnSpec])] = &[
    (Category::Port, PORT_COLUMNS),
    (Category::Sensor, SENSOR_COLUMNS),
    (Category::Fru, FRU_COLUMNS),
    (Category::ControlProcessor, CP_COLUMNS),
];

/// Events kept from the switch event log by default
pub const DEFAULT_EVENT_LIMIT: usize = 5;

// =============================================================================
// Switch MIB
// =============================================================================

/// Brocade switch MIB decoder
///
/// Only the first `event_limit` entries of the event log are decoded;
/// the agent returns the oldest entries first.
#[derive(Debug, Clone, Copy)]
pub struct SwitchMibDecoder {
    event_limit: usize,
}

impl Default for SwitchMibDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_LIMIT)
    }
}

impl SwitchMibDecoder {
    pub fn new(event_limit: usize) -> Self {
        Self { event_limit }
    }

    pub fn event_limit(&self) -> usize {
        self.event_limit
    }
}

impl MibDecoder for SwitchMibDecoder {
    fn columns(&self) -> Vec<&'static str> {
        [oid::FIRMWARE_VERSION, oid::OPER_STATUS, oid::HA_STATUS]
            .into_iter()
            .chain(
                SWITCH_TABLES
                    .iter()
                    .flat_map(|(_, columns)| columns.iter())
                    .chain(EVENT_COLUMNS)
                    .map(|c| c.oid),
            )
            .collect()
    }

    fn decode(&self, walks: &WalkSet, state: &mut ContextState) {
        let mut record = Record::new();
        if let Some(version) = walks.scalar(oid::FIRMWARE_VERSION).filter(|v| v != UNSET) {
            record.insert(switch::FIRMWARE, version);
        }
        if let Some(status) = walks.scalar(oid::OPER_STATUS) {
            record.insert(switch::OPER_STATUS, decode_name::<SwitchOperStatus>(&status));
        }
        if let Some(ha) = walks.scalar(oid::HA_STATUS) {
            record.insert(switch::HA_STATUS, decode_name::<HaStatus>(&ha));
        }
        if !record.is_empty() {
            state.record_mut(Category::Switch).merge(record);
        }

        for (category, columns) in SWITCH_TABLES {
            walk_table(walks, columns, *category, state);
        }
        walk_table_head(walks, EVENT_COLUMNS, Category::Event, state, self.event_limit);
        debug!(
            ports = state.table(Category::Port).map_or(0, |t| t.len()),
            events = state.table(Category::Event).map_or(0, |t| t.len()),
            "Decoded switch MIB"
        );
    }
}

// =============================================================================
// XIV MIB
// =============================================================================

/// IBM XIV MIB decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct XivMibDecoder;

const XIV_SCALARS: &[(&str, &str)] = &[
    (oid::XIV_FAILED_DISKS, xiv::FAILED_DISKS),
    (oid::XIV_MACHINE_STATUS, xiv::MACHINE_STATUS),
    (oid::XIV_UTILIZATION_SOFT, xiv::SOFT_UTILIZATION),
    (oid::XIV_UTILIZATION_HARD, xiv::HARD_UTILIZATION),
];

impl MibDecoder for XivMibDecoder {
    fn columns(&self) -> Vec<&'static str> {
        XIV_SCALARS
            .iter()
            .map(|(column, _)| *column)
            .chain([oid::XIV_IF_STATUS])
            .collect()
    }

    fn decode(&self, walks: &WalkSet, state: &mut ContextState) {
        for (column, field) in XIV_SCALARS {
            if let Some(value) = walks.scalar(column) {
                state.record_mut(Category::System).insert(*field, value);
            }
        }
        walk_table(
            walks,
            &[raw(oid::XIV_IF_STATUS, xiv::INTERFACE_STATUS)],
            Category::InterfaceModule,
            state,
        );
    }
}

// =============================================================================
// Array event MIB
// =============================================================================

/// Huawei OceanStor event table decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayEventDecoder;

impl MibDecoder for ArrayEventDecoder {
    fn columns(&self) -> Vec<&'static str> {
        vec![oid::ARRAY_EVENT_DESCRIPTION, oid::ARRAY_EVENT_DATE]
    }

    /// Dates pair with descriptions by position; only string-typed
    /// descriptions are kept
    fn decode(&self, walks: &WalkSet, state: &mut ContextState) {
        let dates: Vec<String> = walks
            .column(oid::ARRAY_EVENT_DATE)
            .into_values()
            .collect();

        for (position, entry) in walks.entries(oid::ARRAY_EVENT_DESCRIPTION).into_iter().enumerate() {
            if !entry.value_type.eq_ignore_ascii_case("STRING") {
                continue;
            }
            let mut record = Record::new();
            record.insert(
                event::TIME,
                dates.get(position).map_or("N/A", String::as_str),
            );
            record.insert(event::DESCRIPTION, entry.value);
            state
                .table_mut(Category::Event)
                .merge_record((position + 1).to_string(), record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(lines: &[&str], decoder: &dyn MibDecoder) -> ContextState {
        let walks = WalkSet::group(lines, &decoder.columns());
        let mut state = ContextState::default();
        decoder.decode(&walks, &mut state);
        state
    }

    #[test]
    fn test_switch_mib_scalars() {
        let state = walk(
            &[
                ".1.3.6.1.4.1.1588.2.1.1.1.1.6.0 = STRING: \"v8.2.1c\"",
                ".1.3.6.1.4.1.1588.2.1.1.1.1.7.0 = INTEGER: 1",
                ".1.3.6.1.4.1.1588.2.1.2.1.1.0 = INTEGER: 1",
            ],
            &SwitchMibDecoder::default(),
        );

        let switch = state.record(Category::Switch).unwrap();
        assert_eq!(switch.get("Firmware Version"), Some("v8.2.1c"));
        assert_eq!(switch.get("Operational Status"), Some("online"));
        assert_eq!(switch.get("HA Status"), Some("nonredundant"));
    }

    #[test]
    fn test_unset_firmware_skipped() {
        let state = walk(
            &[".1.3.6.1.4.1.1588.2.1.1.1.1.6.0 = STRING: \"-\""],
            &SwitchMibDecoder::default(),
        );
        assert!(state.record(Category::Switch).is_none());
    }

    #[test]
    fn test_switch_mib_port_table() {
        let state = walk(
            &[
                "iso.3.6.1.4.1.1588.2.1.1.1.6.2.1.36.1 = STRING: \"port0\"",
                "iso.3.6.1.4.1.1588.2.1.1.1.6.2.1.36.2 = STRING: \"port1\"",
                "iso.3.6.1.4.1.1588.2.1.1.1.6.2.1.3.1 = INTEGER: 6",
                "iso.3.6.1.4.1.1588.2.1.1.1.6.2.1.3.2 = INTEGER: 42",
                "iso.3.6.1.4.1.1588.2.1.1.1.6.2.1.6.1 = INTEGER: 1",
                "iso.3.6.1.4.1.1588.2.1.1.1.28.1.1.4.1 = STRING: \"-3.0\"",
            ],
            &SwitchMibDecoder::default(),
        );

        let ports = state.table(Category::Port).unwrap();
        let p1 = ports.get("1").unwrap();
        assert_eq!(p1.get("Name"), Some("port0"));
        assert_eq!(p1.get("Physical State"), Some("inSync"));
        assert_eq!(p1.get("Link State"), Some("enable"));
        assert_eq!(p1.get("RX Power (dBm)"), Some("-3.0"));
        assert_eq!(ports.get("2").unwrap().get("Physical State"), Some("unknown(42)"));
    }

    #[test]
    fn test_switch_mib_fru_and_events() {
        let state = walk(
            &[
                ".1.3.6.1.4.1.1588.2.1.2.1.5.1.1.1 = INTEGER: 8",
                ".1.3.6.1.4.1.1588.2.1.2.1.5.1.2.1 = INTEGER: 5",
                ".1.3.6.1.4.1.1588.2.1.1.1.8.5.1.3.1 = INTEGER: 2",
                ".1.3.6.1.4.1.1588.2.1.1.1.8.5.1.5.1 = STRING: \"Fan 1 failed\"",
            ],
            &SwitchMibDecoder::default(),
        );

        let fru = state.table(Category::Fru).unwrap().get("1").unwrap();
        assert_eq!(fru.get("Class"), Some("powerSupply"));
        assert_eq!(fru.get("Status"), Some("faulty"));
        let event = state.table(Category::Event).unwrap().get("1").unwrap();
        assert_eq!(event.get("Level"), Some("error"));
        assert_eq!(event.get("Description"), Some("Fan 1 failed"));
    }

    #[test]
    fn test_switch_mib_event_limit() {
        let mut lines = Vec::new();
        for i in 1..=8 {
            lines.push(format!(".1.3.6.1.4.1.1588.2.1.1.1.8.5.1.3.{} = INTEGER: 1", i));
            lines.push(format!(".1.3.6.1.4.1.1588.2.1.1.1.8.5.1.5.{} = STRING: \"event {}\"", i, i));
        }
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();

        let state = walk(&lines, &SwitchMibDecoder::default());
        let events = state.table(Category::Event).unwrap();
        assert_eq!(events.keys().collect::<Vec<_>>(), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(events.get("5").unwrap().get("Description"), Some("event 5"));

        let state = walk(&lines, &SwitchMibDecoder::new(2));
        assert_eq!(state.table(Category::Event).unwrap().len(), 2);
    }

    #[test]
    fn test_xiv_mib() {
        let state = walk(
            &[
                "XIV-MIB::xivFailedDisks.0 = INTEGER: 0",
                "XIV-MIB::xivMachineStatus.0 = STRING: \"Full Redundancy\"",
                "XIV-MIB::xivUtilizationSoft.0 = Gauge32: 61",
                "XIV-MIB::xivIfStatus.1004 = STRING: \"OK\"",
                "XIV-MIB::xivIfStatus.1005 = STRING: \"Failed\"",
            ],
            &XivMibDecoder,
        );

        let system = state.record(Category::System).unwrap();
        assert_eq!(system.get("Failed Disks"), Some("0"));
        assert_eq!(system.get("Machine Status"), Some("Full Redundancy"));
        assert_eq!(system.get("Soft Utilization(%)"), Some("61"));
        let interfaces = state.table(Category::InterfaceModule).unwrap();
        assert_eq!(interfaces.get("1005").unwrap().get("Status"), Some("Failed"));
    }

    #[test]
    fn test_array_events_pair_dates_by_position() {
        let state = walk(
            &[
                ".1.3.6.1.4.1.2011.2.251.20.1.1.1.1.4.11 = STRING: \"BBU faulty\"",
                ".1.3.6.1.4.1.2011.2.251.20.1.1.1.1.4.12 = STRING: \"Disk offline\"",
                ".1.3.6.1.4.1.2011.2.251.20.1.1.1.1.8.11 = STRING: \"2023-04-01 10:00:00\"",
            ],
            &ArrayEventDecoder,
        );

        let events = state.table(Category::Event).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events.get("1").unwrap().get("Time"), Some("2023-04-01 10:00:00"));
        assert_eq!(events.get("2").unwrap().get("Time"), Some("N/A"));
        assert_eq!(events.get("2").unwrap().get("Description"), Some("Disk offline"));
    }

    #[test]
    fn test_no_such_object_yields_no_events() {
        let state = walk(
            &[".1.3.6.1.4.1.2011.2.251.20.1.1.1.1.4 = No Such Object available on this agent at this OID"],
            &ArrayEventDecoder,
        );
        assert!(state.table(Category::Event).is_none());
    }
}
