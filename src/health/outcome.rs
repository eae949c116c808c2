//! Health Outcomes
//!
//! Per-aspect PASS / FAIL / UNKNOWN results with their alarm lines, and the
//! rollup for one device poll.

use crate::domain::model::ContextId;
use crate::state::Category;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

// =============================================================================
// Health Status
// =============================================================================

/// Outcome of one checked aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Pass,
    Fail,
    /// No data to judge
    Unknown,
}

impl HealthStatus {
    fn severity(&self) -> u8 {
        match self {
            HealthStatus::Pass => 0,
            HealthStatus::Unknown => 1,
            HealthStatus::Fail => 2,
        }
    }

    /// The worse of two outcomes (FAIL > UNKNOWN > PASS)
    pub fn worst(self, other: HealthStatus) -> HealthStatus {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Pass => write!(f, "PASS"),
            HealthStatus::Fail => write!(f, "FAIL"),
            HealthStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// Alarm Line
// =============================================================================

/// Formatted alarm text: `<module> <id> [<field> <value>] ...`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmLine(String);

impl AlarmLine {
    pub fn builder(module: impl std::fmt::Display, id: impl std::fmt::Display) -> AlarmLineBuilder {
        AlarmLineBuilder {
            text: format!("{} {}", module, id),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AlarmLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builder appending `[field value]` pairs
#[derive(Debug, Clone)]
pub struct AlarmLineBuilder {
    text: String,
}

impl AlarmLineBuilder {
    pub fn field(mut self, field: &str, value: impl std::fmt::Display) -> Self {
        self.text.push_str(&format!(" [{} {}]", field, value));
        self
    }

    pub fn build(self) -> AlarmLine {
        AlarmLine(self.text)
    }
}

// =============================================================================
// Aspect
// =============================================================================

/// A checked aspect of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    /// Health/running-state rule over one inventory category
    Module(Category),
    SwitchState,
    Environment,
    Transceivers,
    SystemStatus,
    Sensors,
    Frus,
    ControlProcessors,
    HighAvailability,
    Ports,
    Events,
    XivDisks,
    XivMachine,
    XivInterfaces,
}

impl std::fmt::Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Aspect::Module(category) => write!(f, "{}", category),
            Aspect::SwitchState => write!(f, "switch_state"),
            Aspect::Environment => write!(f, "environment"),
            Aspect::Transceivers => write!(f, "transceivers"),
            Aspect::SystemStatus => write!(f, "system_status"),
            Aspect::Sensors => write!(f, "sensors"),
            Aspect::Frus => write!(f, "frus"),
            Aspect::ControlProcessors => write!(f, "control_processors"),
            Aspect::HighAvailability => write!(f, "high_availability"),
            Aspect::Ports => write!(f, "ports"),
            Aspect::Events => write!(f, "events"),
            Aspect::XivDisks => write!(f, "xiv_disks"),
            Aspect::XivMachine => write!(f, "xiv_machine"),
            Aspect::XivInterfaces => write!(f, "xiv_interfaces"),
        }
    }
}

impl Serialize for Aspect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Aspect Report
// =============================================================================

/// Result of one aspect within one context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectReport {
    pub context: ContextId,
    pub aspect: Aspect,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alarms: Vec<AlarmLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AspectReport {
    /// Start a passing report
    pub fn pass(context: &ContextId, aspect: Aspect) -> Self {
        Self {
            context: context.clone(),
            aspect,
            status: HealthStatus::Pass,
            alarms: Vec::new(),
            detail: None,
        }
    }

    /// Report with no data to judge
    pub fn unknown(context: &ContextId, aspect: Aspect, detail: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unknown,
            detail: Some(detail.into()),
            ..Self::pass(context, aspect)
        }
    }

    /// Failing report without alarm lines
    pub fn fail(context: &ContextId, aspect: Aspect, detail: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Fail,
            detail: Some(detail.into()),
            ..Self::pass(context, aspect)
        }
    }

    /// Append an alarm line; the aspect fails
    pub fn push_alarm(&mut self, alarm: AlarmLine) {
        self.status = HealthStatus::Fail;
        self.alarms.push(alarm);
    }
}

// =============================================================================
// Health Report
// =============================================================================

/// Ordered aspect results plus informational summary values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthReport {
    pub aspects: Vec<AspectReport>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub summary: IndexMap<String, String>,
}

impl HealthReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, aspect: AspectReport) {
        self.aspects.push(aspect);
    }

    /// Record an informational value
    pub fn note(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.summary.insert(label.into(), value.into());
    }

    /// FAIL if any aspect failed, else UNKNOWN if any is unknown, else PASS
    pub fn overall(&self) -> HealthStatus {
        self.aspects
            .iter()
            .fold(HealthStatus::Pass, |acc, a| acc.worst(a.status))
    }

    /// Every alarm line in aspect order
    pub fn alarm_lines(&self) -> impl Iterator<Item = &AlarmLine> {
        self.aspects.iter().flat_map(|a| a.alarms.iter())
    }

    /// First report for an aspect in a context
    pub fn aspect(&self, context: &ContextId, aspect: Aspect) -> Option<&AspectReport> {
        self.aspects
            .iter()
            .find(|a| &a.context == context && a.aspect == aspect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alarm_line_format() {
        let line = AlarmLine::builder(Category::Disk, "CTE0.1")
            .field("Health Status", "Fault")
            .field("Running Status", "Offline")
            .build();
        assert_eq!(
            line.as_str(),
            "disk CTE0.1 [Health Status Fault] [Running Status Offline]"
        );
    }

    #[test]
    fn test_overall_rollup() {
        let ctx = ContextId::default();
        let mut report = HealthReport::new();
        assert_eq!(report.overall(), HealthStatus::Pass);

        report.push(AspectReport::pass(&ctx, Aspect::SwitchState));
        report.push(AspectReport::unknown(&ctx, Aspect::Environment, "no data"));
        assert_eq!(report.overall(), HealthStatus::Unknown);

        let mut failing = AspectReport::pass(&ctx, Aspect::Transceivers);
        failing.push_alarm(AlarmLine::builder("port", 3).field("Temperature", 75).build());
        report.push(failing);
        assert_eq!(report.overall(), HealthStatus::Fail);
        assert_eq!(report.alarm_lines().count(), 1);
    }

    #[test]
    fn test_aspect_serializes_as_name() {
        let json = serde_json::to_string(&Aspect::Module(Category::StoragePool)).unwrap();
        assert_eq!(json, "\"storage_pool\"");
        assert_eq!(serde_json::to_string(&HealthStatus::Unknown).unwrap(), "\"UNKNOWN\"");
    }
}
