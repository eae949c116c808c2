//! Device State Module
//!
//! Per-poll inventory store shared by the command decoders (writers) and
//! the health evaluator (reader).

pub mod category;
pub mod fields;
pub mod store;

pub use category::*;
pub use store::*;
