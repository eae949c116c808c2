//! Storage Array CLI Decoder
//!
//! Each supported `show ...` command maps to one inventory category and
//! one parser: a fixed-width table keyed by its first column, a
//! single-value key-value block, or an accumulating key-value block for
//! listings that repeat the same labels once per unit.

use crate::domain::ports::CommandDecoder;
use crate::parsing::{KeyValueParser, TableParser};
use crate::session::CommandKey;
use crate::state::{Category, DeviceState};
use tracing::debug;

/// Labels kept from `show controller general`
pub const CONTROLLER_LABELS: &[&str] = &[
    "Controller",
    "Health Status",
    "Running Status",
    "CPU",
    "Location",
    "Role",
    "Cache Capacity",
    "CPU Usage(%)",
    "Memory Usage(%)",
    "Temperature(Celsius)",
    "Voltage(V)",
    "Software Version",
    "PCB Version",
    "SES Version",
    "BMC Version",
    "Logic Version",
    "BIOS Version",
    "All Temperatures(Celsius)",
];

/// Labels kept from `show system general`
pub const SYSTEM_LABELS: &[&str] = &[
    "System Name",
    "Health Status",
    "Running Status",
    "Total Capacity",
    "SN",
    "Location",
    "Product Model",
    "Product Version",
    "High Water Level(%)",
    "Low Water Level(%)",
    "WWN",
    "Time",
    "Patch Version",
];

/// How a command's output is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayParser {
    /// Fixed-width table; header starts with the key prefix
    Table(&'static str),
    /// Key-value block, one value per label
    Single(&'static [&'static str]),
    /// Key-value block, values accumulated per unit
    Grouped(&'static [&'static str]),
}

/// One supported array command
#[derive(Debug, Clone, Copy)]
pub struct ArrayCommand {
    pub command: &'static str,
    pub category: Category,
    pub parser: ArrayParser,
}

const fn table(command: &'static str, category: Category, key: &'static str) -> ArrayCommand {
    ArrayCommand {
        command,
        category,
        parser: ArrayParser::Table(key),
    }
}

/// Supported commands
pub const ARRAY_COMMANDS: &[ArrayCommand] = &[
    table("show alarm", Category::Alarm, "Sequence"),
    table("show bbu general", Category::Bbu, "ID"),
    table("show bbu life", Category::BbuLife, "ID"),
    ArrayCommand {
        command: "show controller general",
        category: Category::Controller,
        parser: ArrayParser::Grouped(CONTROLLER_LABELS),
    },
    table("show disk general", Category::Disk, "ID"),
    table("show disk_domain general", Category::DiskDomain, "ID"),
    table("show enclosure", Category::Enclosure, "ID"),
    table("show expansion_module", Category::ExpansionModule, "ID"),
    table("show fan", Category::Fan, "ID"),
    table("show host general", Category::Host, "ID"),
    table("show interface_module", Category::InterfaceModule, "ID"),
    table("show power_supply", Category::Power, "ID"),
    ArrayCommand {
        command: "show system general",
        category: Category::System,
        parser: ArrayParser::Single(SYSTEM_LABELS),
    },
    table("show storage_pool general", Category::StoragePool, "ID"),
    table("show port fibre_module", Category::FcPort, "PortID"),
];

/// Look up a command, ignoring whitespace differences
pub fn find_command(command: &str) -> Option<&'static ArrayCommand> {
    let normalized = command.split_whitespace().collect::<Vec<_>>().join(" ");
    ARRAY_COMMANDS.iter().find(|c| c.command == normalized)
}

/// Decoder for storage-array CLI transcripts
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayDecoder;

impl ArrayDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl CommandDecoder for ArrayDecoder {
    fn decode(&self, key: &CommandKey, lines: &[String], state: &mut DeviceState) {
        let Some(entry) = find_command(&key.command) else {
            debug!(command = %key, "No decoder for command, ignored");
            return;
        };
        let context = state.context_mut(&key.context);

        match entry.parser {
            ArrayParser::Table(prefix) => {
                let parsed = TableParser::new(prefix).parse(lines);
                debug!(command = %key, rows = parsed.len(), "Decoded listing");
                context.table_mut(entry.category).merge(parsed);
            }
            ArrayParser::Single(labels) => {
                let parsed = KeyValueParser::with_labels(labels.iter().copied()).parse(lines);
                context.record_mut(entry.category).merge(parsed);
            }
            ArrayParser::Grouped(labels) => {
                let parsed =
                    KeyValueParser::with_labels(labels.iter().copied()).parse_grouped(lines);
                // Units are positional; replaying a buffer must not append them twice
                *context.grouped_mut(entry.category) = parsed;
            }
        }
    }
}
