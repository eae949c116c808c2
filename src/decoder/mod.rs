//! Command Decoders
//!
//! Vendor-specific decoders turning segmented CLI buffers and SNMP walks
//! into [`crate::state::DeviceState`] categories.

pub mod array;
pub mod environment;
pub mod fabric;
pub mod firmware;
pub mod mib;
pub mod port;
pub mod switch;

pub use array::*;
pub use environment::*;
pub use fabric::*;
pub use firmware::*;
pub use mib::*;
pub use port::*;
pub use switch::*;
