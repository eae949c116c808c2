//! Device State Categories
//!
//! Closed set of inventory categories. Each category has exactly one
//! storage shape, so decoders and the evaluator always agree on whether a
//! category holds keyed records, a single record, or per-unit value lists.

use serde::{Deserialize, Serialize};

/// Storage shape of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Records keyed by primary key
    Table,
    /// One record
    Record,
    /// Label to per-unit value lists
    Grouped,
}

/// Inventory category of a device context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    // Switch
    Switch,
    Port,
    Temperature,
    Sensor,
    Fan,
    Power,
    Slot,
    Fabric,
    Firmware,
    IpAddress,
    Cfg,
    Fru,
    ControlProcessor,
    Event,
    // Storage array
    Alarm,
    Bbu,
    BbuLife,
    Controller,
    Disk,
    DiskDomain,
    Enclosure,
    ExpansionModule,
    Host,
    InterfaceModule,
    StoragePool,
    FcPort,
    System,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 27] = [
        Category::Switch,
        Category::Port,
        Category::Temperature,
        Category::Sensor,
        Category::Fan,
        Category::Power,
        Category::Slot,
        Category::Fabric,
        Category::Firmware,
        Category::IpAddress,
        Category::Cfg,
        Category::Fru,
        Category::ControlProcessor,
        Category::Event,
        Category::Alarm,
        Category::Bbu,
        Category::BbuLife,
        Category::Controller,
        Category::Disk,
        Category::DiskDomain,
        Category::Enclosure,
        Category::ExpansionModule,
        Category::Host,
        Category::InterfaceModule,
        Category::StoragePool,
        Category::FcPort,
        Category::System,
    ];

    pub fn shape(&self) -> Shape {
        match self {
            Category::Switch | Category::Cfg | Category::System => Shape::Record,
            Category::Controller => Shape::Grouped,
            _ => Shape::Table,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Switch => "switch",
            Category::Port => "port",
            Category::Temperature => "temperature",
            Category::Sensor => "sensor",
            Category::Fan => "fan",
            Category::Power => "power",
            Category::Slot => "slot",
            Category::Fabric => "fabric",
            Category::Firmware => "firmware",
            Category::IpAddress => "ip_address",
            Category::Cfg => "cfg",
            Category::Fru => "fru",
            Category::ControlProcessor => "control_processor",
            Category::Event => "event",
            Category::Alarm => "alarm",
            Category::Bbu => "bbu",
            Category::BbuLife => "bbu_life",
            Category::Controller => "controller",
            Category::Disk => "disk",
            Category::DiskDomain => "disk_domain",
            Category::Enclosure => "enclosure",
            Category::ExpansionModule => "expansion_module",
            Category::Host => "host",
            Category::InterfaceModule => "interface_module",
            Category::StoragePool => "storage_pool",
            Category::FcPort => "fc_port",
            Category::System => "system",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes() {
        assert_eq!(Category::Port.shape(), Shape::Table);
        assert_eq!(Category::Switch.shape(), Shape::Record);
        assert_eq!(Category::Controller.shape(), Shape::Grouped);
        assert_eq!(
            Category::ALL.iter().filter(|c| c.shape() == Shape::Record).count(),
            3
        );
    }

    #[test]
    fn test_display_matches_serde() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }
}
