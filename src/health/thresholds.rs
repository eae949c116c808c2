//! Transceiver Thresholds
//!
//! Open-interval bounds for optical/electrical transceiver readings. A
//! value equal to either bound is a violation.

use crate::error::{Error, Result};
use crate::state::fields::port;
use serde::{Deserialize, Serialize};

// =============================================================================
// Unit Conversion
// =============================================================================

/// Convert a log-ratio power reading (dBm) to microwatts
pub fn dbm_to_microwatts(dbm: f64) -> f64 {
    10f64.powf(dbm / 10.0) * 1000.0
}

// =============================================================================
// Threshold Rule
// =============================================================================

/// Acceptable range `low < value < high` for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub field: String,
    pub low: f64,
    pub high: f64,
}

impl ThresholdRule {
    pub fn new(field: impl Into<String>, low: f64, high: f64) -> Self {
        Self {
            field: field.into(),
            low,
            high,
        }
    }

    /// Check a value against the open interval
    pub fn accepts(&self, value: f64) -> bool {
        self.low < value && value < self.high
    }

    /// Parse and check a raw reading; malformed readings are rejected
    pub fn accepts_raw(&self, raw: &str) -> bool {
        raw.trim()
            .parse::<f64>()
            .map(|v| v.is_finite() && self.accepts(v))
            .unwrap_or(false)
    }
}

// =============================================================================
// Transceiver Thresholds
// =============================================================================

/// Threshold set applied to every port carrying transceiver readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransceiverThresholds {
    /// Tracked quantities
    pub rules: Vec<ThresholdRule>,
    /// Port states that exempt a port from numeric checks (case-insensitive)
    pub absent_states: Vec<String>,
}

impl Default for TransceiverThresholds {
    fn default() -> Self {
        Self {
            rules: vec![
                ThresholdRule::new(port::TEMPERATURE, 0.0, 75.0),  // Centigrade
                ThresholdRule::new(port::CURRENT, 2.0, 11.5),      // mA
                ThresholdRule::new(port::VOLTAGE, 3100.0, 3500.0), // mV
                ThresholdRule::new(port::RX_POWER, 32.0, 790.0),   // uW
                ThresholdRule::new(port::TX_POWER, 200.0, 790.0),  // uW
            ],
            absent_states: vec!["no_module".to_string(), "no_light".to_string()],
        }
    }
}

impl TransceiverThresholds {
    /// Rule for a field, if tracked
    pub fn rule(&self, field: &str) -> Option<&ThresholdRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    /// Whether a port state marks the module as absent
    pub fn is_absent(&self, state: &str) -> bool {
        let state = state.trim();
        self.absent_states
            .iter()
            .any(|s| s.eq_ignore_ascii_case(state))
    }

    /// Validate every rule
    pub fn validate(&self) -> Result<()> {
        for rule in &self.rules {
            if rule.field.trim().is_empty() {
                return Err(Error::Configuration(
                    "Threshold rule with empty field name".to_string(),
                ));
            }
            if !(rule.low < rule.high) {
                return Err(Error::Configuration(format!(
                    "Threshold for {} must satisfy low < high (got {} .. {})",
                    rule.field, rule.low, rule.high
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_interval() {
        let thresholds = TransceiverThresholds::default();
        let temp = thresholds.rule(port::TEMPERATURE).unwrap();

        assert!(!temp.accepts(75.0));
        assert!(temp.accepts(74.9));
        assert!(!temp.accepts(0.0));
        assert!(!temp.accepts_raw("N/A"));
        assert!(!temp.accepts_raw("inf"));
        assert!(temp.accepts_raw(" 36 "));
    }

    #[test]
    fn test_dbm_conversion() {
        assert_eq!(format!("{:.1}", dbm_to_microwatts(-3.0)), "501.2");
        assert_eq!(dbm_to_microwatts(0.0), 1000.0);
    }

    #[test]
    fn test_absent_states() {
        let thresholds = TransceiverThresholds::default();
        assert!(thresholds.is_absent("No_Module"));
        assert!(thresholds.is_absent("no_light"));
        assert!(!thresholds.is_absent("Online"));
    }

    #[test]
    fn test_validate() {
        let mut thresholds = TransceiverThresholds::default();
        assert!(thresholds.validate().is_ok());

        thresholds.rules.push(ThresholdRule::new(port::RX_POWER, 790.0, 32.0));
        assert!(matches!(thresholds.validate(), Err(Error::Configuration(_))));
    }
}
