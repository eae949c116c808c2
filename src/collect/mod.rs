//! Collection Module
//!
//! Transcript source adapters, the per-poll inspector and the concurrent
//! multi-device runner.

pub mod inspector;
pub mod runner;
pub mod source;

pub use inspector::*;
pub use runner::*;
pub use source::*;
