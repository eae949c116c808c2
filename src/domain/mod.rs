//! Domain layer - Core data model and port definitions
//!
//! This module defines the record/table model every parser produces and
//! the traits (ports) that transcript adapters and decoders implement,
//! following hexagonal architecture principles.

pub mod model;
pub mod ports;

pub use model::*;
pub use ports::*;
