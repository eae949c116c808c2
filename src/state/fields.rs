//! Field names shared by decoders and the health evaluator.

/// Switch summary record (`switchshow` labels plus MIB scalars)
pub mod switch {
    pub const NAME: &str = "switchName";
    pub const STATE: &str = "switchState";
    pub const WWN: &str = "switchWwn";
    pub const DOMAIN: &str = "switchDomain";
    pub const FIRMWARE: &str = "Firmware Version";
    pub const OPER_STATUS: &str = "Operational Status";
    pub const HA_STATUS: &str = "HA Status";
}

/// Port table: `switchshow` rows, `portshow` labels, transceiver readings
pub mod port {
    pub const INDEX: &str = "Index";
    pub const SLOT: &str = "Slot";
    pub const PORT: &str = "Port";
    pub const ADDRESS: &str = "Address";
    pub const MEDIA: &str = "Media";
    pub const SPEED: &str = "Speed";
    pub const STATE: &str = "State";
    pub const PROTO: &str = "Proto";

    pub const PORT_INDEX: &str = "portIndex";
    pub const CONNECTED: &str = "portWwn of device(s) connected";
    pub const PHYS: &str = "portPhys";
    pub const SCN: &str = "portScn";

    pub const TEMPERATURE: &str = "Temperature";
    pub const CURRENT: &str = "Current";
    pub const VOLTAGE: &str = "Voltage";
    pub const RX_POWER: &str = "RX Power";
    pub const TX_POWER: &str = "TX Power";

    // MIB-sourced
    pub const NAME: &str = "Name";
    pub const TYPE: &str = "Port Type";
    pub const PHYSICAL_STATE: &str = "Physical State";
    pub const OPER_STATUS: &str = "Operational Status";
    pub const ADMIN_STATUS: &str = "Admin Status";
    pub const LINK_STATE: &str = "Link State";
    pub const SFP_TEMPERATURE: &str = "SFP Temperature";
    pub const SFP_VOLTAGE: &str = "SFP Voltage";
    pub const SFP_CURRENT: &str = "SFP Current";
    pub const RX_POWER_DBM: &str = "RX Power (dBm)";
    pub const TX_POWER_DBM: &str = "TX Power (dBm)";
    pub const POWER_ON_HOURS: &str = "Power On Hours";
}

/// Environment tables (`tempshow`, `sensorshow`, `fanshow`, `psshow`)
pub mod env {
    pub const ID: &str = "ID";
    pub const STATE: &str = "State";
    pub const TYPE: &str = "Type";
    pub const VALUE: &str = "Value";
    pub const SPEED: &str = "Speed";
    pub const CENTIGRADE: &str = "Centigrade";
    pub const FAHRENHEIT: &str = "Fahrenheit";
    pub const STATUS: &str = "Status";
    pub const INFO: &str = "Info";
}

pub mod slot {
    pub const SLOT: &str = "Slot";
    pub const BLADE_TYPE: &str = "Blade Type";
    pub const ID: &str = "ID";
    pub const MODEL: &str = "Model Name";
    pub const STATUS: &str = "Status";
}

pub mod firmware {
    pub const SLOT: &str = "Slot";
    pub const NAME: &str = "Name";
    pub const APPL: &str = "Appl";
    pub const PRIMARY: &str = "Primary";
    pub const SECONDARY: &str = "Secondary";
    pub const STATUS: &str = "Status";
    /// Key used for the non-director firmware row
    pub const FOS_KEY: &str = "FOS";
}

pub mod fabric {
    pub const SWITCH: &str = "Switch";
    pub const ID: &str = "ID";
    pub const WWN: &str = "WWN";
    pub const IP: &str = "IP";
    pub const NAME: &str = "Name";
    pub const PRINCIPAL: &str = "Principal";
}

pub mod ip {
    pub const SECTION: &str = "Section";
    pub const IP: &str = "IP";
    pub const NETMASK: &str = "Netmask";
    pub const GATEWAY: &str = "Gateway";
    pub const HOSTNAME: &str = "Hostname";
}

/// SNMP FRU table
pub mod fru {
    pub const CLASS: &str = "Class";
    pub const STATUS: &str = "Status";
    pub const OBJECT_NUM: &str = "Object Number";
    pub const SUPPLIER_ID: &str = "Supplier ID";
    pub const SUPPLIER_PART: &str = "Supplier Part Number";
    pub const SUPPLIER_SERIAL: &str = "Supplier Serial Number";
    pub const SUPPLIER_REVISION: &str = "Supplier Revision";
    pub const POWER: &str = "Power Consumption";
}

/// SNMP control processor table
pub mod cp {
    pub const STATUS: &str = "Status";
    pub const IP: &str = "IP";
    pub const NETMASK: &str = "Netmask";
    pub const GATEWAY: &str = "Gateway";
    pub const LAST_EVENT: &str = "Last Event";
}

/// SNMP event log rows (switch and array)
pub mod event {
    pub const TIME: &str = "Time";
    pub const LEVEL: &str = "Level";
    pub const REPEAT: &str = "Repeat Count";
    pub const DESCRIPTION: &str = "Description";
    pub const VF_ID: &str = "VF ID";
}

/// Storage array listings
pub mod array {
    pub const ID: &str = "ID";
    pub const HEALTH_STATUS: &str = "Health Status";
    pub const RUNNING_STATUS: &str = "Running Status";
    pub const CONTROLLER: &str = "Controller";
    pub const TOTAL_CAPACITY: &str = "Total Capacity";
    pub const FREE_CAPACITY: &str = "Free Capacity";
    pub const REMAINING_LIFETIME: &str = "Remaining Lifetime(days)";
    pub const OCCURRED_ON: &str = "Occurred On";
    pub const NAME: &str = "Name";
    pub const PRODUCT_VERSION: &str = "Product Version";
}

/// XIV MIB scalars
pub mod xiv {
    pub const FAILED_DISKS: &str = "Failed Disks";
    pub const MACHINE_STATUS: &str = "Machine Status";
    pub const SOFT_UTILIZATION: &str = "Soft Utilization(%)";
    pub const HARD_UTILIZATION: &str = "Hard Utilization(%)";
    pub const INTERFACE_STATUS: &str = "Status";
}
