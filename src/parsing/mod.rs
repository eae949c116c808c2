//! Parsing Module
//!
//! Generic parsers for vendor CLI listings and SNMP walk output. These are
//! the leaves of the crate: they never fail and know nothing about
//! individual commands.

pub mod key_value;
pub mod snmp_walk;
pub mod table;

pub use key_value::*;
pub use snmp_walk::*;
pub use table::*;
