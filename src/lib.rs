//! SAN PM Inspector - Preventive-Maintenance Inspection Engine
//!
//! Decodes vendor CLI transcripts and SNMP walk dumps captured from SAN
//! switches and storage arrays into a structured per-device inventory,
//! then evaluates it against health rules to produce alarm lines.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                        PollRunner (tokio)                            │
//! │          one task per TranscriptSource, results merged after         │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │                           Inspector                                  │
//! │                                                                      │
//! │  CLI transcript                          SNMP walk dump              │
//! │  ┌───────────────────┐                   ┌───────────────────┐       │
//! │  │ SessionSegmenter  │                   │ WalkSet::group    │       │
//! │  └─────────┬─────────┘                   └─────────┬─────────┘       │
//! │            │ (context, command) buffers            │ columns         │
//! │  ┌─────────┴─────────┐                   ┌─────────┴─────────┐       │
//! │  │  CommandDecoders  │                   │   MibDecoders     │       │
//! │  │ Table / KeyValue  │                   │   code tables     │       │
//! │  └─────────┬─────────┘                   └─────────┬─────────┘       │
//! │            └──────────────┬────────────────────────┘                 │
//! │                 ┌─────────┴─────────┐                                │
//! │                 │    DeviceState    │  context → category → records  │
//! │                 └─────────┬─────────┘                                │
//! │                 ┌─────────┴─────────┐                                │
//! │                 │  HealthEvaluator  │  PASS / FAIL / UNKNOWN         │
//! │                 └───────────────────┘  + alarm lines                 │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`parsing`]: Fixed-width table, key-value and SNMP walk parsers
//! - [`session`]: Prompt-driven transcript segmentation
//! - [`decoder`]: Per-command switch/array decoders and MIB decoders
//! - [`state`]: Per-poll device state store
//! - [`health`]: Health rules, thresholds and alarm lines
//! - [`collect`]: Transcript sources, inspector and poll runner
//! - [`config`]: Engine configuration
//! - [`domain`]: Core data model and port traits
//! - [`error`]: Error types and handling

pub mod collect;
pub mod config;
pub mod decoder;
pub mod domain;
pub mod error;
pub mod health;
pub mod parsing;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use collect::{
    DeviceReport, FileTranscriptSource, Inspector, PollOutcome, PollRunner,
    StaticTranscriptSource,
};

pub use config::EngineConfig;

pub use decoder::{ArrayDecoder, ArrayEventDecoder, SwitchDecoder, SwitchMibDecoder, XivMibDecoder};

pub use domain::model::{ContextId, GroupedRecord, Record, Table};
pub use domain::ports::{CommandDecoder, DeviceKind, MibDecoder, TranscriptSource};

pub use error::{Error, Result};

pub use health::{
    AlarmLine, Aspect, AspectReport, HealthEvaluator, HealthReport, HealthStatus, ModulePolicy,
    ThresholdRule, TransceiverThresholds,
};

pub use parsing::{KeyValueParser, TableParser, WalkSet};

pub use session::{CommandKey, PromptConfig, Segmentation, SessionSegmenter};

pub use state::{Category, ContextState, DeviceState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
