//! SNMP Health Rules
//!
//! Rules over state decoded from MIB walks. Code-table fields are stored
//! by display name, so each rule reads them back through
//! [`CodeTable::from_name`]; a name that maps to nothing is treated as
//! missing data.

use super::codes::{
    CodeTable, CpStatus, EventLevel, FruStatus, HaStatus, PortLinkState, PortPhysicalState,
    SensorStatus, SwitchOperStatus,
};
use super::evaluator::HealthEvaluator;
use super::outcome::{AlarmLine, Aspect, AspectReport, HealthReport};
use super::thresholds::dbm_to_microwatts;
use crate::domain::model::{ContextId, Table};
use crate::state::fields::{cp, env, event, fru, port, switch, xiv};
use crate::state::{Category, ContextState, DeviceState};
use tracing::debug;

/// Machine status reported by a healthy XIV frame
pub const XIV_FULL_REDUNDANCY: &str = "Full Redundancy";

/// Interface states accepted on XIV modules
pub const XIV_INTERFACE_OK: &[&str] = &["OK", "Ready"];

impl HealthEvaluator {
    // -------------------------------------------------------------------------
    // Device profiles
    // -------------------------------------------------------------------------

    /// Switch MIB profile, evaluated per context
    pub fn evaluate_switch_mib(&self, device: &DeviceState) -> HealthReport {
        let mut report = HealthReport::new();
        for (context, state) in device.contexts() {
            report.push(self.evaluate_system_status(context, state));
            report.push(self.evaluate_sensors(context, state));
            report.push(self.evaluate_frus(context, state));
            report.push(self.evaluate_control_processors(context, state));
            report.push(self.evaluate_high_availability(context, state));
            report.push(self.evaluate_ports(context, state));
            report.push(self.evaluate_switch_events(context, state));
            if let Some(version) = super::summary::firmware_version(state) {
                report.note(format!("{} Firmware Version", context), version);
            }
        }
        report
    }

    /// XIV array MIB profile
    pub fn evaluate_xiv(&self, device: &DeviceState) -> HealthReport {
        let mut report = HealthReport::new();
        for (context, state) in device.contexts() {
            report.push(self.evaluate_xiv_disks(context, state));
            report.push(self.evaluate_xiv_machine(context, state));
            report.push(self.evaluate_xiv_interfaces(context, state));

            if let Some(system) = state.record(Category::System) {
                for field in [xiv::SOFT_UTILIZATION, xiv::HARD_UTILIZATION] {
                    if let Some(value) = system.get(field) {
                        report.note(field, value);
                    }
                }
            }
        }
        report
    }

    /// Storage array event MIB profile
    pub fn evaluate_array_mib(&self, device: &DeviceState) -> HealthReport {
        let mut report = HealthReport::new();
        for (context, state) in device.contexts() {
            report.push(self.evaluate_alarms(context, state, Category::Event));
        }
        report
    }

    // -------------------------------------------------------------------------
    // Switch MIB rules
    // -------------------------------------------------------------------------

    /// Operational status must be online; unmapped codes are unknown
    pub fn evaluate_system_status(&self, context: &ContextId, state: &ContextState) -> AspectReport {
        let aspect = Aspect::SystemStatus;
        let raw = state
            .record(Category::Switch)
            .and_then(|r| r.get(switch::OPER_STATUS));
        let Some(status) = raw.and_then(SwitchOperStatus::from_name) else {
            return AspectReport::unknown(context, aspect, "operational status not decoded");
        };

        let mut report = AspectReport::pass(context, aspect);
        if status != SwitchOperStatus::Online {
            report.push_alarm(
                AlarmLine::builder(Category::Switch, context)
                    .field(switch::OPER_STATUS, &status)
                    .build(),
            );
        }
        report
    }

    /// Sensors pass when nominal or absent
    pub fn evaluate_sensors(&self, context: &ContextId, state: &ContextState) -> AspectReport {
        self.evaluate_coded(context, state, Category::Sensor, Aspect::Sensors, env::STATUS, |name| {
            matches!(
                SensorStatus::from_name(name),
                Some(SensorStatus::Nominal | SensorStatus::Absent)
            )
        })
    }

    /// FRUs fail only when faulty
    pub fn evaluate_frus(&self, context: &ContextId, state: &ContextState) -> AspectReport {
        self.evaluate_coded(context, state, Category::Fru, Aspect::Frus, fru::STATUS, |name| {
            FruStatus::from_name(name) != Some(FruStatus::Faulty)
        })
    }

    /// Control processors fail only when failed
    pub fn evaluate_control_processors(
        &self,
        context: &ContextId,
        state: &ContextState,
    ) -> AspectReport {
        self.evaluate_coded(
            context,
            state,
            Category::ControlProcessor,
            Aspect::ControlProcessors,
            cp::STATUS,
            |name| CpStatus::from_name(name) != Some(CpStatus::Failed),
        )
    }

    /// Director HA must be redundant
    pub fn evaluate_high_availability(
        &self,
        context: &ContextId,
        state: &ContextState,
    ) -> AspectReport {
        let aspect = Aspect::HighAvailability;
        let raw = state
            .record(Category::Switch)
            .and_then(|r| r.get(switch::HA_STATUS));
        let Some(raw) = raw else {
            return AspectReport::unknown(context, aspect, "no HA status");
        };

        let mut report = AspectReport::pass(context, aspect);
        match HaStatus::from_name(raw) {
            Some(HaStatus::Redundant) => {}
            Some(_) => report.push_alarm(
                AlarmLine::builder(Category::Switch, context)
                    .field(switch::HA_STATUS, raw)
                    .build(),
            ),
            None => return AspectReport::unknown(context, aspect, format!("HA status {}", raw)),
        }
        report
    }

    /// Physical state and optical power of every enabled port
    pub fn evaluate_ports(&self, context: &ContextId, state: &ContextState) -> AspectReport {
        let aspect = Aspect::Ports;
        let Some(ports) = state.table(Category::Port) else {
            return AspectReport::unknown(context, aspect, "no port table");
        };

        let mut report = AspectReport::pass(context, aspect);
        for (key, record) in ports.iter() {
            let link = record.get(port::LINK_STATE).and_then(PortLinkState::from_name);
            if link == Some(PortLinkState::Disabled) {
                debug!(context = %context, port = key, "Port disabled, skipped");
                continue;
            }
            let Some(phys) = record
                .get(port::PHYSICAL_STATE)
                .and_then(PortPhysicalState::from_name)
            else {
                continue;
            };

            let name = record.get(port::NAME).unwrap_or(key);
            if phys.is_fault() {
                report.push_alarm(
                    AlarmLine::builder(Category::Port, name)
                        .field(port::PHYSICAL_STATE, &phys)
                        .build(),
                );
                continue;
            }
            if phys != PortPhysicalState::InSync {
                continue;
            }

            let mut line = AlarmLine::builder(Category::Port, name);
            let mut failed = false;
            for (dbm_field, field) in [
                (port::RX_POWER_DBM, port::RX_POWER),
                (port::TX_POWER_DBM, port::TX_POWER),
            ] {
                let Some(rule) = self.thresholds.rule(field) else {
                    continue;
                };
                let microwatts = power_microwatts(record.get(dbm_field));
                if !rule.accepts(microwatts) {
                    line = line.field(field, format!("{:.0}", microwatts));
                    failed = true;
                }
            }
            if failed {
                report.push_alarm(line.build());
            }
        }
        report
    }

    /// Critical and error events fail the switch
    pub fn evaluate_switch_events(&self, context: &ContextId, state: &ContextState) -> AspectReport {
        let mut report = AspectReport::pass(context, Aspect::Events);
        let Some(events) = state.table(Category::Event) else {
            return report;
        };

        for (key, record) in events.iter() {
            let alarm = record
                .get(event::LEVEL)
                .and_then(EventLevel::from_name)
                .is_some_and(|level| level.is_alarm());
            if !alarm {
                continue;
            }
            let line = [event::LEVEL, event::TIME, event::DESCRIPTION]
                .into_iter()
                .filter_map(|f| record.get(f).map(|v| (f, v)))
                .fold(AlarmLine::builder(Category::Event, key), |line, (f, v)| {
                    line.field(f, v)
                });
            report.push_alarm(line.build());
        }
        report
    }

    // -------------------------------------------------------------------------
    // XIV rules
    // -------------------------------------------------------------------------

    pub fn evaluate_xiv_disks(&self, context: &ContextId, state: &ContextState) -> AspectReport {
        self.evaluate_xiv_scalar(context, state, Aspect::XivDisks, xiv::FAILED_DISKS, |v| {
            v == "0"
        })
    }

    pub fn evaluate_xiv_machine(&self, context: &ContextId, state: &ContextState) -> AspectReport {
        self.evaluate_xiv_scalar(context, state, Aspect::XivMachine, xiv::MACHINE_STATUS, |v| {
            v == XIV_FULL_REDUNDANCY
        })
    }

    pub fn evaluate_xiv_interfaces(&self, context: &ContextId, state: &ContextState) -> AspectReport {
        let aspect = Aspect::XivInterfaces;
        let Some(interfaces) = state.table(Category::InterfaceModule) else {
            return AspectReport::unknown(context, aspect, "no interface status");
        };

        let mut report = AspectReport::pass(context, aspect);
        for (key, record) in interfaces.iter() {
            let status = record.get(xiv::INTERFACE_STATUS).unwrap_or("N/A");
            if !XIV_INTERFACE_OK.contains(&status) {
                report.push_alarm(
                    AlarmLine::builder(Category::InterfaceModule, key)
                        .field(xiv::INTERFACE_STATUS, status)
                        .build(),
                );
            }
        }
        report
    }

    // -------------------------------------------------------------------------
    // Shared shapes
    // -------------------------------------------------------------------------

    /// One alarm per record whose coded field is rejected
    fn evaluate_coded(
        &self,
        context: &ContextId,
        state: &ContextState,
        category: Category,
        aspect: Aspect,
        field: &str,
        accept: impl Fn(&str) -> bool,
    ) -> AspectReport {
        let Some(table) = state.table(category).filter(|t| !t.is_empty()) else {
            return AspectReport::unknown(context, aspect, format!("no {} records", category));
        };

        let mut report = AspectReport::pass(context, aspect);
        for (key, value) in coded_values(table, field) {
            if !accept(value) {
                report.push_alarm(
                    AlarmLine::builder(category, key)
                        .field(field, value)
                        .build(),
                );
            }
        }
        report
    }

    fn evaluate_xiv_scalar(
        &self,
        context: &ContextId,
        state: &ContextState,
        aspect: Aspect,
        field: &str,
        accept: impl Fn(&str) -> bool,
    ) -> AspectReport {
        let Some(value) = state.record(Category::System).and_then(|r| r.get(field)) else {
            return AspectReport::unknown(context, aspect, format!("no {}", field));
        };

        let mut report = AspectReport::pass(context, aspect);
        if !accept(value) {
            report.push_alarm(
                AlarmLine::builder(Category::System, context)
                    .field(field, value)
                    .build(),
            );
        }
        report
    }
}

fn coded_values<'a>(table: &'a Table, field: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
    table
        .iter()
        .map(move |(key, record)| (key, record.get(field).unwrap_or("N/A")))
}

/// Optical power in whole microwatts; non-numeric input reads as 0 dBm
fn power_microwatts(dbm: Option<&str>) -> f64 {
    let dbm = dbm
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    dbm_to_microwatts(dbm).round()
}
