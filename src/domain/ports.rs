//! Domain Ports - Core trait definitions for the inspector
//!
//! These traits define the boundaries between the decoding core and the
//! collaborators that fetch raw text from devices. Adapters implement
//! these traits to provide concrete functionality.

use crate::error::{Error, Result};
use crate::parsing::WalkSet;
use crate::session::{CommandKey, Segmentation};
use crate::state::{ContextState, DeviceState};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Device Kinds
// =============================================================================

/// What kind of device a transcript was captured from, and how
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    /// SAN switch, interactive CLI transcript
    Switch,
    /// Storage array, interactive CLI transcript
    Array,
    /// SAN switch, SNMP walk dump
    SwitchMib,
    /// Storage array, SNMP event walk dump
    ArrayMib,
    /// XIV array, SNMP walk dump
    XivMib,
}

impl DeviceKind {
    /// Whether the input is an SNMP walk dump rather than a CLI transcript
    pub fn is_snmp(&self) -> bool {
        matches!(
            self,
            DeviceKind::SwitchMib | DeviceKind::ArrayMib | DeviceKind::XivMib
        )
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceKind::Switch => write!(f, "switch"),
            DeviceKind::Array => write!(f, "array"),
            DeviceKind::SwitchMib => write!(f, "switch-mib"),
            DeviceKind::ArrayMib => write!(f, "array-mib"),
            DeviceKind::XivMib => write!(f, "xiv-mib"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "switch" => Ok(DeviceKind::Switch),
            "array" => Ok(DeviceKind::Array),
            "switch-mib" => Ok(DeviceKind::SwitchMib),
            "array-mib" => Ok(DeviceKind::ArrayMib),
            "xiv-mib" => Ok(DeviceKind::XivMib),
            other => Err(Error::Configuration(format!(
                "Unknown device kind: {}",
                other
            ))),
        }
    }
}

// =============================================================================
// Transcript Source Port
// =============================================================================

/// Supplies the raw text of one device poll.
///
/// Transport concerns (SSH sessions, SNMP agents, timeouts) live behind
/// this trait; the core only ever sees the resulting lines.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Identifier used in reports and logs
    fn device_id(&self) -> &str;

    /// Kind of device and capture format
    fn kind(&self) -> DeviceKind;

    /// Fetch the raw lines
    async fn fetch(&self) -> Result<Vec<String>>;
}

// =============================================================================
// Command Decoder Port
// =============================================================================

/// Decodes segmented command output into a device state
pub trait CommandDecoder: Send + Sync {
    /// Decode one buffer; unknown commands are ignored
    fn decode(&self, key: &CommandKey, lines: &[String], state: &mut DeviceState);

    /// Decode a whole segmented transcript
    fn decode_session(&self, session: &Segmentation, state: &mut DeviceState) {
        for context in session.contexts() {
            state.register_context(context);
        }
        for (key, lines) in session.buffers() {
            self.decode(key, lines, state);
        }
    }
}

// =============================================================================
// MIB Decoder Port
// =============================================================================

/// Decodes grouped SNMP walk output into one context
pub trait MibDecoder: Send + Sync {
    /// Column OIDs (or symbolic object names) this decoder reads
    fn columns(&self) -> Vec<&'static str>;

    /// Decode the walks into a context
    fn decode(&self, walks: &WalkSet, state: &mut ContextState);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_kind_round_trip_names() {
        for kind in [
            DeviceKind::Switch,
            DeviceKind::Array,
            DeviceKind::SwitchMib,
            DeviceKind::ArrayMib,
            DeviceKind::XivMib,
        ] {
            assert_eq!(kind.to_string().parse::<DeviceKind>().unwrap(), kind);
        }
        assert!("router".parse::<DeviceKind>().is_err());
        assert!(DeviceKind::XivMib.is_snmp());
        assert!(!DeviceKind::Array.is_snmp());
    }
}
