//! Session Module
//!
//! Prompt-driven segmentation of interactive CLI transcripts.

pub mod segmenter;

pub use segmenter::*;
