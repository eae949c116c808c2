//! SNMP Code Tables
//!
//! Index-coded MIB fields decode through fixed enums. A code missing from
//! a table logs a warning and decodes to the `Unknown` variant carrying the
//! raw code; decoding never fails. Tables whose vendor definition contains
//! an explicit "unknown" entry expose it as `Indeterminate`.

use tracing::warn;

/// Common behaviour of index-coded enumerations
pub trait CodeTable: Sized + std::fmt::Display {
    /// MIB field name used in warnings
    const FIELD: &'static str;

    /// Look up a code without logging
    fn from_code(code: &str) -> Option<Self>;

    /// Inverse of `Display`, used when reading decoded names back from records
    fn from_name(name: &str) -> Option<Self>;

    /// Build the unmapped variant
    fn unmapped(code: &str) -> Self;

    /// Decode a raw value; unmapped codes log a warning
    fn decode(raw: &str) -> Self {
        let code = raw.trim();
        Self::from_code(code).unwrap_or_else(|| {
            warn!(field = Self::FIELD, code, "SNMP decode failed, index not defined");
            Self::unmapped(code)
        })
    }
}

/// Decode a raw value straight to its display name
pub fn decode_name<T: CodeTable>(raw: &str) -> String {
    T::decode(raw).to_string()
}

macro_rules! code_table {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $code:literal => $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            /// Code not present in the table
            Unknown(String),
        }

        impl CodeTable for $name {
            const FIELD: &'static str = $field;

            fn from_code(code: &str) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $text => Some($name::$variant), )+
                    _ => None,
                }
            }

            fn unmapped(code: &str) -> Self {
                $name::Unknown(code.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $( $name::$variant => f.write_str($text), )+
                    $name::Unknown(code) => write!(f, "unknown({})", code),
                }
            }
        }
    };
}

// =============================================================================
// Switch System
// =============================================================================

code_table! {
    /// Switch operational status
    SwitchOperStatus, "sys_stat" {
        "1" => Online = "online",
        "2" => Offline = "offline",
        "3" => Testing = "testing",
        "4" => Faulty = "faulty",
    }
}

code_table! {
    /// High-availability status of a director
    HaStatus, "ha_stat" {
        "0" => Redundant = "redundant",
        "1" => NonRedundant = "nonredundant",
    }
}

// =============================================================================
// Sensors
// =============================================================================

code_table! {
    SensorType, "Sensor Type" {
        "1" => Indeterminate = "unknown",
        "2" => Other = "other",
        "3" => Battery = "battery",
        "4" => Fan = "fan",
        "5" => PowerSupply = "power-supply",
        "6" => Transmitter = "transmitter",
        "7" => Enclosure = "enclosure",
        "8" => Board = "board",
        "9" => Receiver = "receiver",
    }
}

code_table! {
    SensorStatus, "Sensor Stat" {
        "1" => Indeterminate = "unknown",
        "2" => Faulty = "faulty",
        "3" => BelowMin = "below-min",
        "4" => Nominal = "nominal",
        "5" => AboveMax = "above-max",
        "6" => Absent = "absent",
    }
}

// =============================================================================
// FC Ports
// =============================================================================

code_table! {
    /// ASIC type of a switch port
    PortType, "Port Type" {
        "1" => Stitch = "stitch",
        "2" => Flannel = "flannel",
        "3" => Loom = "loom",
        "4" => Bloom = "bloom",
        "5" => RdBloom = "rdbloom",
        "6" => Wormhole = "wormhole",
        "7" => Other = "other",
        "8" => Indeterminate = "unknown",
    }
}

code_table! {
    /// Physical state of the port transceiver
    PortPhysicalState, "Port PHY Stat" {
        "1" => NoCard = "noCard",
        "2" => NoTransceiver = "noTransceiver",
        "3" => LaserFault = "laserFault",
        "4" => NoLight = "noLight",
        "5" => NoSync = "noSync",
        "6" => InSync = "inSync",
        "7" => PortFault = "portFault",
        "8" => DiagFault = "diagFault",
        "9" => LockRef = "lockRef",
        "10" => Validating = "validating",
        "11" => InvalidModule = "invalidModule",
        "14" => NoSigDet = "noSigDet",
        "255" => Indeterminate = "unknown",
    }
}

impl PortPhysicalState {
    /// States that fail a port outright
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            PortPhysicalState::LaserFault
                | PortPhysicalState::NoSync
                | PortPhysicalState::PortFault
                | PortPhysicalState::DiagFault
        )
    }
}

code_table! {
    PortOperStatus, "Port OP Stat" {
        "0" => Indeterminate = "unknown",
        "1" => Online = "online",
        "2" => Offline = "offline",
        "3" => Testing = "testing",
        "4" => Faulty = "faulty",
    }
}

code_table! {
    PortAdminStatus, "Port ADM Stat" {
        "1" => Online = "online",
        "2" => Offline = "offline",
        "3" => Testing = "testing",
        "4" => Faulty = "faulty",
    }
}

code_table! {
    PortLinkState, "Port Link Stat" {
        "1" => Enabled = "enable",
        "2" => Disabled = "disabled",
        "3" => Loopback = "loopback",
    }
}

// =============================================================================
// FRUs and Control Processors
// =============================================================================

code_table! {
    FruClass, "FRU Class" {
        "1" => Other = "other",
        "2" => Indeterminate = "unknown",
        "3" => Chassis = "chassis",
        "4" => Cp = "CP",
        "5" => OtherCp = "other-CP",
        "6" => SwitchBlade = "switchblade",
        "7" => Wwn = "wwn",
        "8" => PowerSupply = "powerSupply",
        "9" => Fan = "fan",
        "10" => CoreBlade = "CoreBlade",
        "11" => ApplicationBlade = "ApplicationBlade",
    }
}

code_table! {
    FruStatus, "FRU Stat" {
        "1" => Other = "other",
        "2" => Indeterminate = "unknown",
        "3" => On = "on",
        "4" => Off = "off",
        "5" => Faulty = "faulty",
    }
}

code_table! {
    CpStatus, "CP Stat" {
        "1" => Other = "other",
        "2" => Indeterminate = "unknown",
        "3" => Active = "active",
        "4" => Standby = "standby",
        "5" => Failed = "failed",
    }
}

code_table! {
    CpLastEvent, "CP Last Event" {
        "1" => Other = "other",
        "2" => Indeterminate = "unknown",
        "3" => HaSync = "haSync",
        "4" => HaOutSync = "haOutSync",
        "5" => CpFaulty = "cpFaulty",
        "6" => CpHealthy = "cpHealthy",
        "7" => CpActive = "cpActive",
        "8" => ConfigChange = "configChange",
        "9" => FailOverStart = "failOverStart",
        "10" => FailOverDone = "failOverDone",
        "11" => FirmwareCommit = "firmwareCommit",
        "12" => FirmwareUpgrade = "firmwareUpgrade",
    }
}

// =============================================================================
// Event Log
// =============================================================================

code_table! {
    EventLevel, "event level" {
        "1" => Critical = "critical",
        "2" => Error = "error",
        "3" => Warning = "warning",
        "4" => Info = "info",
        "5" => Debug = "debug",
    }
}

impl EventLevel {
    /// Levels that count as an alarm
    pub fn is_alarm(&self) -> bool {
        matches!(self, EventLevel::Critical | EventLevel::Error)
    }
}
