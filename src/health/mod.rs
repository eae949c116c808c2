//! Health evaluation
//!
//! Rule-based classification of a decoded device state into
//! PASS / FAIL / UNKNOWN outcomes with alarm lines.

pub mod codes;
pub mod evaluator;
pub mod outcome;
pub mod snmp;
pub mod summary;
pub mod thresholds;

pub use codes::*;
pub use evaluator::*;
pub use outcome::*;
pub use snmp::*;
pub use summary::*;
pub use thresholds::*;
