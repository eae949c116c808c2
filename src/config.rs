//! Engine Configuration
//!
//! Prompt layout, transceiver thresholds and categorical module policy,
//! loadable from YAML:
//!
//! ```yaml
//! prompt:
//!   username: admin
//!   virtual_fabric: true
//! thresholds:
//!   rules:
//!     - { field: Temperature, low: 0, high: 70 }
//! policy:
//!   normal_running: [Online, Running]
//!   event_limit: 10
//! ```

use crate::error::{Error, Result};
use crate::health::{HealthEvaluator, ModulePolicy, TransceiverThresholds};
use crate::session::PromptConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Everything one poll needs besides the transcript itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub prompt: PromptConfig,
    pub thresholds: TransceiverThresholds,
    pub policy: ModulePolicy,
}

impl EngineConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading engine configuration");
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.prompt.delimiter.is_empty() {
            return Err(Error::Configuration(
                "Prompt delimiter must not be empty".to_string(),
            ));
        }
        if self.prompt.username.trim().is_empty() {
            return Err(Error::Configuration(
                "Prompt username must not be empty".to_string(),
            ));
        }
        self.thresholds.validate()?;
        self.policy.validate()
    }

    /// Fresh evaluator carrying this configuration
    pub fn evaluator(&self) -> HealthEvaluator {
        HealthEvaluator::new(self.policy.clone(), self.thresholds.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.prompt.delimiter, ">");
        assert_eq!(config.thresholds.rules.len(), 5);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EngineConfig::from_yaml_str(
            r#"
prompt:
  username: root
  virtual_fabric: true
thresholds:
  rules:
    - { field: Temperature, low: 0, high: 70 }
"#,
        )
        .unwrap();

        assert_eq!(config.prompt.username, "root");
        assert!(config.prompt.virtual_fabric);
        assert_eq!(config.prompt.delimiter, ">");
        assert_eq!(config.thresholds.rules.len(), 1);
        assert_eq!(config.thresholds.rule("Temperature").unwrap().high, 70.0);
        assert_eq!(config.policy, ModulePolicy::default());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert_matches!(
            EngineConfig::from_yaml_str("prompt:\n  username: \"\"\n"),
            Err(Error::Configuration(_))
        );
        assert_matches!(
            EngineConfig::from_yaml_str(
                "thresholds:\n  rules:\n    - { field: Voltage, low: 3500, high: 3100 }\n"
            ),
            Err(Error::Configuration(_))
        );
        assert_matches!(
            EngineConfig::from_yaml_str("prompt: [not, a, map]"),
            Err(Error::Yaml(_))
        );
        assert_matches!(
            EngineConfig::from_yaml_str("policy:\n  event_limit: 0\n"),
            Err(Error::Configuration(_))
        );
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "policy:\n  switch_online: Online\n  environment_ok: [Ok, Normal]").unwrap();

        let config = EngineConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.policy.environment_ok, vec!["Ok", "Normal"]);
        assert_eq!(config.policy.event_limit, 5);

        assert_matches!(
            EngineConfig::from_yaml_file("/nonexistent/inspector.yaml"),
            Err(Error::Io(_))
        );
    }
}
