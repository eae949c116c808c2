//! Transcript Sources
//!
//! Adapters for the [`TranscriptSource`] port. Live transports (SSH, SNMP
//! agents) are out of scope; captured session logs and walk dumps are
//! read from disk instead.

use crate::domain::ports::{DeviceKind, TranscriptSource};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

// =============================================================================
// File Source
// =============================================================================

/// A captured transcript on disk
#[derive(Debug, Clone)]
pub struct FileTranscriptSource {
    device_id: String,
    kind: DeviceKind,
    path: PathBuf,
}

impl FileTranscriptSource {
    /// Device id defaults to the file stem
    pub fn new(path: impl Into<PathBuf>, kind: DeviceKind) -> Self {
        let path = path.into();
        let device_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            device_id,
            kind,
            path,
        }
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TranscriptSource for FileTranscriptSource {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn kind(&self) -> DeviceKind {
        self.kind
    }

    async fn fetch(&self) -> Result<Vec<String>> {
        let bytes = fs::read(&self.path).await.map_err(|e| Error::TranscriptSource {
            device: self.device_id.clone(),
            reason: format!("{}: {}", self.path.display(), e),
        })?;

        // Terminal noise may include bytes that are not UTF-8
        let text = String::from_utf8_lossy(&bytes);
        let lines: Vec<String> = text
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect();
        debug!(device = %self.device_id, lines = lines.len(), "Read transcript");
        Ok(lines)
    }
}

// =============================================================================
// Static Source
// =============================================================================

/// Transcript already held in memory
#[derive(Debug, Clone)]
pub struct StaticTranscriptSource {
    device_id: String,
    kind: DeviceKind,
    lines: Vec<String>,
}

impl StaticTranscriptSource {
    pub fn new<I, S>(device_id: impl Into<String>, kind: DeviceKind, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            device_id: device_id.into(),
            kind,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl TranscriptSource for StaticTranscriptSource {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn kind(&self) -> DeviceKind {
        self.kind
    }

    async fn fetch(&self) -> Result<Vec<String>> {
        Ok(self.lines.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_source_reads_lines() {
        let mut file = tempfile::Builder::new().suffix(".log").tempfile().unwrap();
        file.write_all(b"SW1:admin> fanshow\r\nFan 1 is Ok, speed is 7105 RPM\r\n")
            .unwrap();

        let source = FileTranscriptSource::new(file.path(), DeviceKind::Switch);
        let expected_id = file.path().file_stem().unwrap().to_string_lossy().into_owned();
        assert_eq!(source.device_id(), expected_id);

        let lines = source.fetch().await.unwrap();
        assert_eq!(lines, vec!["SW1:admin> fanshow", "Fan 1 is Ok, speed is 7105 RPM"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_source_error() {
        let source = FileTranscriptSource::new("/nonexistent/sw01.log", DeviceKind::Switch)
            .with_device_id("sw01");
        let err = source.fetch().await.unwrap_err();
        assert_matches!(err, Error::TranscriptSource { ref device, .. } if device == "sw01");
        assert!(err.is_transient());
    }

    #[test]
    fn test_static_source() {
        let source = StaticTranscriptSource::new("array01", DeviceKind::Array, ["admin:/>show alarm"]);
        let lines = tokio_test::block_on(source.fetch()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(source.kind(), DeviceKind::Array);
    }
}
