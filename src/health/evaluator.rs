//! Health Evaluator
//!
//! Stateless rule engine over a decoded device state. Each rule yields a
//! PASS / FAIL / UNKNOWN outcome plus alarm lines in table iteration order,
//! so identical input always yields identical reports.
//!
//! Rules:
//! - categorical: health (and running state, when present) must be in the
//!   allowed sets
//! - numeric: every tracked transceiver reading must lie strictly inside
//!   its bounds
//! - alarm listings: any record present fails the aspect

use super::outcome::{AlarmLine, Aspect, AspectReport, HealthReport};
use super::summary::{bbu_lifetimes, capacity_tib, firmware_version};
use super::thresholds::TransceiverThresholds;
use crate::decoder::mib::DEFAULT_EVENT_LIMIT;
use crate::domain::model::{ContextId, Record};
use crate::error::{Error, Result};
use crate::state::fields::{array, env, event, port, switch};
use crate::state::{Category, CategoryView, ContextState, DeviceState};
use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// Constants
// =============================================================================

/// Array categories checked by the categorical rule, in report order
pub const ARRAY_MODULES: &[Category] = &[
    Category::Bbu,
    Category::Disk,
    Category::DiskDomain,
    Category::Enclosure,
    Category::Fan,
    Category::InterfaceModule,
    Category::Power,
    Category::StoragePool,
    Category::FcPort,
    Category::Host,
    Category::Alarm,
    Category::System,
    Category::Controller,
];

/// Switch CLI environment tables
pub const ENVIRONMENT_TABLES: &[Category] = &[
    Category::Temperature,
    Category::Sensor,
    Category::Fan,
    Category::Power,
];

// =============================================================================
// Module Policy
// =============================================================================

/// Allowed values for the categorical rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulePolicy {
    /// Accepted `Health Status` values
    pub normal_health: Vec<String>,
    /// Accepted `Running Status` values
    pub normal_running: Vec<String>,
    /// Accepted environment states (case-insensitive)
    pub environment_ok: Vec<String>,
    /// Accepted `switchState`
    pub switch_online: String,
    /// Switch MIB event log entries decoded per poll
    pub event_limit: usize,
}

impl Default for ModulePolicy {
    fn default() -> Self {
        Self {
            normal_health: vec!["Normal".to_string()],
            normal_running: ["Running", "Online", "Link Up", "Normal"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            environment_ok: vec!["Ok".to_string()],
            switch_online: "Online".to_string(),
            event_limit: DEFAULT_EVENT_LIMIT,
        }
    }
}

impl ModulePolicy {
    pub fn validate(&self) -> Result<()> {
        if self.normal_health.is_empty() {
            return Err(Error::Configuration(
                "normal_health must list at least one value".to_string(),
            ));
        }
        if self.normal_running.is_empty() {
            return Err(Error::Configuration(
                "normal_running must list at least one value".to_string(),
            ));
        }
        if self.event_limit == 0 {
            return Err(Error::Configuration(
                "event_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn health_ok(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| self.normal_health.iter().any(|n| n == v))
    }

    fn running_ok(&self, value: Option<&str>) -> bool {
        value.map_or(true, |v| self.normal_running.iter().any(|n| n == v))
    }

    fn environment_state_ok(&self, value: &str) -> bool {
        self.environment_ok
            .iter()
            .any(|s| s.eq_ignore_ascii_case(value.trim()))
    }
}

// =============================================================================
// Health Evaluator
// =============================================================================

/// Rule engine; one instance per poll
#[derive(Debug, Clone, Default)]
pub struct HealthEvaluator {
    pub(crate) policy: ModulePolicy,
    pub(crate) thresholds: TransceiverThresholds,
}

impl HealthEvaluator {
    pub fn new(policy: ModulePolicy, thresholds: TransceiverThresholds) -> Self {
        Self { policy, thresholds }
    }

    pub fn policy(&self) -> &ModulePolicy {
        &self.policy
    }

    pub fn thresholds(&self) -> &TransceiverThresholds {
        &self.thresholds
    }

    // -------------------------------------------------------------------------
    // Device profiles
    // -------------------------------------------------------------------------

    /// Switch CLI profile, evaluated per context
    pub fn evaluate_switch(&self, device: &DeviceState) -> HealthReport {
        let mut report = HealthReport::new();
        for (context, state) in device.contexts() {
            report.push(self.evaluate_switch_state(context, state));
            report.push(self.evaluate_environment(context, state));
            report.push(self.evaluate_transceivers(context, state));
            if let Some(version) = firmware_version(state) {
                report.note(format!("{} Firmware Version", context), version);
            }
        }
        report
    }

    /// Storage array CLI profile
    pub fn evaluate_array(&self, device: &DeviceState) -> HealthReport {
        let mut report = HealthReport::new();
        let empty = ContextState::default();
        let default_context = ContextId::default();
        let (context, state) = device
            .contexts()
            .next()
            .unwrap_or((&default_context, &empty));

        for category in ARRAY_MODULES {
            report.push(self.evaluate_module(context, state, *category));
        }

        if let Some((total, free)) = capacity_tib(state) {
            report.note("Total/free capacity(TiB)", format!("{:.3}|{:.3}", total, free));
        }
        let lifetimes = bbu_lifetimes(state);
        let lifetimes = if lifetimes.is_empty() {
            "N/A".to_string()
        } else {
            lifetimes.join("|")
        };
        report.note("BBU Remaining Lifetime(days)", lifetimes);
        if let Some(version) = state
            .record(Category::System)
            .and_then(|r| r.get(array::PRODUCT_VERSION))
        {
            report.note("Product Version", version);
        }
        report
    }

    // -------------------------------------------------------------------------
    // Categorical rule
    // -------------------------------------------------------------------------

    /// Health/running-state rule over one category
    pub fn evaluate_module(
        &self,
        context: &ContextId,
        state: &ContextState,
        category: Category,
    ) -> AspectReport {
        if matches!(category, Category::Alarm | Category::Event) {
            return self.evaluate_alarms(context, state, category);
        }

        let aspect = Aspect::Module(category);
        let units = units_of(state, category);
        if units.is_empty() {
            return if category == Category::Host {
                AspectReport::fail(context, aspect, "no host records")
            } else {
                AspectReport::unknown(context, aspect, format!("no {} records", category))
            };
        }

        let mut report = AspectReport::pass(context, aspect);
        for (id, record) in &units {
            let health = record.get(array::HEALTH_STATUS);
            let running = record.get(array::RUNNING_STATUS);
            if self.policy.health_ok(health) && self.policy.running_ok(running) {
                continue;
            }

            let mut line = AlarmLine::builder(category, id)
                .field(array::HEALTH_STATUS, health.unwrap_or("N/A"));
            if let Some(running) = running {
                line = line.field(array::RUNNING_STATUS, running);
            }
            report.push_alarm(line.build());
        }
        report
    }

    /// Alarm/event listings: any record present fails
    pub fn evaluate_alarms(
        &self,
        context: &ContextId,
        state: &ContextState,
        category: Category,
    ) -> AspectReport {
        let aspect = Aspect::Module(category);
        let mut report = AspectReport::pass(context, aspect);
        let Some(table) = state.table(category) else {
            return report;
        };

        let detail_fields: &[&str] = match category {
            Category::Alarm => &[array::OCCURRED_ON, array::NAME],
            _ => &[event::TIME, event::DESCRIPTION],
        };
        for (key, record) in table.iter() {
            let line = detail_fields
                .iter()
                .filter_map(|f| record.get(f).map(|v| (*f, v)))
                .fold(AlarmLine::builder(category, key), |line, (f, v)| {
                    line.field(f, v)
                });
            report.push_alarm(line.build());
        }
        report
    }

    // -------------------------------------------------------------------------
    // Switch CLI rules
    // -------------------------------------------------------------------------

    /// `switchState` must be online
    pub fn evaluate_switch_state(&self, context: &ContextId, state: &ContextState) -> AspectReport {
        let aspect = Aspect::SwitchState;
        let Some(record) = state.record(Category::Switch) else {
            return AspectReport::unknown(context, aspect, "no switch record");
        };
        let Some(value) = record.get(switch::STATE) else {
            return AspectReport::unknown(context, aspect, "no switchState");
        };

        let mut report = AspectReport::pass(context, aspect);
        if value != self.policy.switch_online {
            let name = record.get(switch::NAME).unwrap_or(context.as_str());
            report.push_alarm(
                AlarmLine::builder(Category::Switch, name)
                    .field(switch::STATE, value)
                    .build(),
            );
        }
        report
    }

    /// Temperature, sensor, fan and power listings must report OK
    pub fn evaluate_environment(&self, context: &ContextId, state: &ContextState) -> AspectReport {
        let aspect = Aspect::Environment;
        if ENVIRONMENT_TABLES.iter().all(|c| state.is_empty(*c)) {
            return AspectReport::unknown(context, aspect, "no environment listings");
        }

        let mut report = AspectReport::pass(context, aspect);
        for category in ENVIRONMENT_TABLES {
            let Some(table) = state.table(*category) else {
                continue;
            };
            for (key, record) in table.iter() {
                let value = record.get(env::STATE).unwrap_or("N/A");
                if !self.policy.environment_state_ok(value) {
                    report.push_alarm(
                        AlarmLine::builder(category, key)
                            .field(env::STATE, value)
                            .build(),
                    );
                }
            }
        }
        report
    }

    /// Every tracked transceiver reading must lie inside its bounds
    pub fn evaluate_transceivers(&self, context: &ContextId, state: &ContextState) -> AspectReport {
        let aspect = Aspect::Transceivers;
        let Some(ports) = state.table(Category::Port) else {
            return AspectReport::unknown(context, aspect, "no port table");
        };

        let mut report = AspectReport::pass(context, aspect);
        let mut evaluated = 0usize;
        for (key, record) in ports.iter() {
            let readings: Vec<_> = self
                .thresholds
                .rules
                .iter()
                .map(|rule| (rule, record.get(&rule.field)))
                .collect();
            if readings.iter().all(|(_, value)| value.is_none()) {
                continue;
            }
            if let Some(port_state) = record.get(port::STATE) {
                if self.thresholds.is_absent(port_state) {
                    debug!(context = %context, port = key, state = port_state, "Transceiver absent, exempt");
                    continue;
                }
            }

            evaluated += 1;
            let failing: Vec<_> = readings
                .iter()
                .filter(|(rule, value)| !value.is_some_and(|v| rule.accepts_raw(v)))
                .collect();
            if failing.is_empty() {
                continue;
            }

            let line = failing.iter().fold(
                AlarmLine::builder(Category::Port, key),
                |line, (rule, value)| line.field(&rule.field, value.unwrap_or("missing")),
            );
            report.push_alarm(line.build());
        }

        if evaluated == 0 {
            return AspectReport::unknown(context, aspect, "no transceiver readings");
        }
        report
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Flatten a category into `(id, record)` units
fn units_of(state: &ContextState, category: Category) -> Vec<(String, Record)> {
    match state.get(category) {
        Some(CategoryView::Table(table)) => table
            .iter()
            .filter(|(_, r)| !r.is_empty())
            .map(|(k, r)| (k.to_string(), r.clone()))
            .collect(),
        Some(CategoryView::Grouped(grouped)) => (0..grouped.units())
            .map(|i| {
                let record = grouped.unit(i);
                let id = record
                    .get(array::CONTROLLER)
                    .map(str::to_string)
                    .unwrap_or_else(|| i.to_string());
                (id, record)
            })
            .collect(),
        Some(CategoryView::Record(record)) if !record.is_empty() => {
            let id = record
                .get("System Name")
                .or_else(|| record.get(switch::NAME))
                .unwrap_or("-")
                .to_string();
            vec![(id, record.clone())]
        }
        _ => Vec::new(),
    }
}
