//! Inspector
//!
//! One poll end to end: segment (or group walks), decode into a fresh
//! [`DeviceState`] and evaluate. An inspector owns no state between
//! polls; every call builds its own segmenter, store and evaluator.

use crate::config::EngineConfig;
use crate::decoder::{ArrayDecoder, ArrayEventDecoder, SwitchDecoder, SwitchMibDecoder, XivMibDecoder};
use crate::domain::model::ContextId;
use crate::domain::ports::{CommandDecoder, DeviceKind, MibDecoder};
use crate::health::{HealthReport, HealthStatus};
use crate::parsing::WalkSet;
use crate::session::{PromptConfig, SessionSegmenter};
use crate::state::DeviceState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

// =============================================================================
// Device Report
// =============================================================================

/// Result of inspecting one device
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport {
    pub device_id: String,
    pub kind: DeviceKind,
    pub polled_at: DateTime<Utc>,
    pub status: HealthStatus,
    pub alarms: Vec<String>,
    pub health: HealthReport,
    pub state: DeviceState,
}

// =============================================================================
// Inspector
// =============================================================================

/// Decodes and evaluates transcripts of one device kind
#[derive(Debug, Clone)]
pub struct Inspector {
    kind: DeviceKind,
    config: EngineConfig,
}

impl Inspector {
    pub fn new(kind: DeviceKind, config: EngineConfig) -> Self {
        Self { kind, config }
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Decode raw lines into a fresh device state
    pub fn decode<S: AsRef<str>>(&self, lines: &[S]) -> DeviceState {
        let mut state = DeviceState::new();
        match self.kind {
            DeviceKind::Switch => {
                let session = SessionSegmenter::new(self.config.prompt.clone())
                    .segment(lines.iter().map(|line| line.as_ref()));
                debug!(buffers = session.len(), "Segmented switch transcript");
                SwitchDecoder::new().decode_session(&session, &mut state);
            }
            DeviceKind::Array => {
                let prompt = PromptConfig {
                    preserve_indentation: true,
                    ..self.config.prompt.clone()
                };
                let session =
                    SessionSegmenter::new(prompt).segment(lines.iter().map(|line| line.as_ref()));
                debug!(buffers = session.len(), "Segmented array transcript");
                ArrayDecoder::new().decode_session(&session, &mut state);
            }
            DeviceKind::SwitchMib => {
                let decoder = SwitchMibDecoder::new(self.config.policy.event_limit);
                self.decode_walks(&decoder, lines, &mut state)
            },
            DeviceKind::ArrayMib => self.decode_walks(&ArrayEventDecoder, lines, &mut state),
            DeviceKind::XivMib => self.decode_walks(&XivMibDecoder, lines, &mut state),
        }
        state
    }

    fn decode_walks<S: AsRef<str>>(
        &self,
        decoder: &dyn MibDecoder,
        lines: &[S],
        state: &mut DeviceState,
    ) {
        let walks = WalkSet::group(lines, &decoder.columns());
        if walks.is_empty() {
            warn!(kind = %self.kind, "Walk dump matched no known column");
        }
        let context = ContextId::new(&self.config.prompt.default_context);
        decoder.decode(&walks, state.context_mut(&context));
    }

    /// Evaluate a decoded state with this inspector's rules
    pub fn evaluate(&self, state: &DeviceState) -> HealthReport {
        let evaluator = self.config.evaluator();
        match self.kind {
            DeviceKind::Switch => evaluator.evaluate_switch(state),
            DeviceKind::Array => evaluator.evaluate_array(state),
            DeviceKind::SwitchMib => evaluator.evaluate_switch_mib(state),
            DeviceKind::ArrayMib => evaluator.evaluate_array_mib(state),
            DeviceKind::XivMib => evaluator.evaluate_xiv(state),
        }
    }

    /// Inspect one poll's raw lines
    pub fn inspect<S: AsRef<str>>(&self, device_id: &str, lines: &[S]) -> DeviceReport {
        let polled_at = Utc::now();
        let mut state = self.decode(lines);
        if state.is_empty() {
            warn!(device = device_id, "No prompt found in transcript");
            state.register_context(&ContextId::new(&self.config.prompt.default_context));
        }

        let health = self.evaluate(&state);
        let status = health.overall();
        let alarms: Vec<String> = health.alarm_lines().map(|a| a.as_str().to_string()).collect();
        info!(
            device = device_id,
            kind = %self.kind,
            status = ?status,
            alarms = alarms.len(),
            "Inspection complete"
        );

        DeviceReport {
            device_id: device_id.to_string(),
            kind: self.kind,
            polled_at,
            status,
            alarms,
            health,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Aspect;
    use crate::state::Category;

    #[test]
    fn test_switch_inspection() {
        let inspector = Inspector::new(DeviceKind::Switch, EngineConfig::default());
        let report = inspector.inspect(
            "sw01",
            &[
                "SW01:admin> switchshow",
                "switchName:\tSW01",
                "switchState:\tOnline",
                "SW01:admin> fanshow",
                "Fan 1 is Ok, speed is 7105 RPM",
                "Fan 2 is Faulty, speed is 0 RPM",
                "SW01:admin> ",
            ],
        );

        assert_eq!(report.device_id, "sw01");
        assert_eq!(report.status, HealthStatus::Fail);
        let ctx = ContextId::default();
        assert_eq!(
            report.health.aspect(&ctx, Aspect::SwitchState).unwrap().status,
            HealthStatus::Pass
        );
        assert_eq!(
            report.health.aspect(&ctx, Aspect::Environment).unwrap().status,
            HealthStatus::Fail
        );
        assert_eq!(report.state.table(&ctx, Category::Fan).unwrap().len(), 2);
    }

    #[test]
    fn test_array_inspection_keeps_column_alignment() {
        let inspector = Inspector::new(DeviceKind::Array, EngineConfig::default());
        let state = inspector.decode(&[
            "admin:/>show fan",
            "  ID        Health Status  Running Status",
            "  --------  -------------  --------------",
            "  CTE0.A.0  Normal         Running",
            "admin:/>",
        ]);

        let fans = state.table(&ContextId::default(), Category::Fan).unwrap();
        assert_eq!(fans.get("CTE0.A.0").unwrap().get("Running Status"), Some("Running"));
    }

    #[test]
    fn test_empty_transcript_is_unknown() {
        let inspector = Inspector::new(DeviceKind::Switch, EngineConfig::default());
        let report = inspector.inspect::<&str>("sw02", &[]);
        assert_eq!(report.status, HealthStatus::Unknown);
        assert!(report.alarms.is_empty());
    }

    #[test]
    fn test_xiv_walk_inspection() {
        let inspector = Inspector::new(DeviceKind::XivMib, EngineConfig::default());
        let report = inspector.inspect(
            "xiv01",
            &[
                "XIV-MIB::xivFailedDisks.0 = INTEGER: 0",
                "XIV-MIB::xivMachineStatus.0 = STRING: \"Full Redundancy\"",
                "XIV-MIB::xivIfStatus.1004 = STRING: \"Ready\"",
            ],
        );
        assert_eq!(report.status, HealthStatus::Pass);
    }

    #[test]
    fn test_switch_mib_default_snmpwalk_output() {
        let inspector = Inspector::new(DeviceKind::SwitchMib, EngineConfig::default());
        let state = inspector.decode(&["SNMPv2-SMI::enterprises.1588.2.1.1.1.1.7.0 = INTEGER: 1"]);

        let switch = state.record(&ContextId::default(), Category::Switch).unwrap();
        assert_eq!(switch.get("Operational Status"), Some("online"));
    }

    #[test]
    fn test_switch_mib_event_limit_from_config() {
        let mut config = EngineConfig::default();
        config.policy.event_limit = 1;
        let inspector = Inspector::new(DeviceKind::SwitchMib, config);
        let state = inspector.decode(&[
            ".1.3.6.1.4.1.1588.2.1.1.1.8.5.1.3.1 = INTEGER: 4",
            ".1.3.6.1.4.1.1588.2.1.1.1.8.5.1.3.2 = INTEGER: 1",
        ]);

        let events = state.table(&ContextId::default(), Category::Event).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events.get("1").unwrap().get("Level"), Some("info"));
    }

    #[test]
    fn test_report_serializes() {
        let inspector = Inspector::new(DeviceKind::ArrayMib, EngineConfig::default());
        let report = inspector.inspect(
            "oceanstor01",
            &[".1.3.6.1.4.1.2011.2.251.20.1.1.1.1.4.1 = STRING: \"Disk offline\""],
        );

        assert_eq!(report.status, HealthStatus::Fail);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "array-mib");
        assert_eq!(json["status"], "FAIL");
        assert_eq!(json["state"]["FID0"]["tables"]["event"]["records"]["1"]["Description"], "Disk offline");
    }
}
