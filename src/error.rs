//! Error types for the SAN PM Inspector
//!
//! Parsers, decoders and the health evaluator never fail: malformed vendor
//! output degrades to partial records and UNKNOWN outcomes. The error type
//! here covers the fallible edges only: configuration, transcript sources
//! and the concurrent poll runner.

use thiserror::Error;

/// Unified error type for the inspector
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Transcript Errors
    // =========================================================================
    #[error("Transcript source failed for {device}: {reason}")]
    TranscriptSource { device: String, reason: String },

    #[error("Invalid transcript path pattern: {0}")]
    PathPattern(String),

    #[error("Poll worker failed: {0}")]
    Worker(String),

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error is transient (a later poll may succeed)
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::TranscriptSource { .. } | Error::Worker(_) | Error::Io(_)
        )
    }
}

/// Result type alias for the inspector
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_transient() {
        let err = Error::TranscriptSource {
            device: "sw01".into(),
            reason: "session closed".into(),
        };
        assert!(err.is_transient());
        assert_eq!(
            err.to_string(),
            "Transcript source failed for sw01: session closed"
        );

        let config_err = Error::Configuration("invalid".into());
        assert!(!config_err.is_transient());
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parsed: std::result::Result<Vec<u32>, _> = serde_yaml::from_str("{not: [a list");
        let err: Error = parsed.unwrap_err().into();
        assert!(matches!(err, Error::Yaml(_)));
    }
}
