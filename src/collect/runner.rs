//! Poll Runner
//!
//! Polls many devices concurrently, one tokio task per source. Each task
//! owns its own [`Inspector`]; finished reports are pushed into a shared
//! collection only after decoding and evaluation complete.

use super::inspector::{DeviceReport, Inspector};
use crate::config::EngineConfig;
use crate::domain::ports::TranscriptSource;
use crate::error::{Error, Result};
use futures::future::join_all;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info};

/// Outcome of one runner pass
#[derive(Debug, Default)]
pub struct PollOutcome {
    /// Reports sorted by device id
    pub reports: Vec<DeviceReport>,
    /// Devices whose source failed, with the error
    pub failures: Vec<(String, Error)>,
}

/// Concurrent multi-device poller
pub struct PollRunner {
    config: EngineConfig,
    sources: Vec<Arc<dyn TranscriptSource>>,
}

impl PollRunner {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
        }
    }

    pub fn add_source(&mut self, source: Arc<dyn TranscriptSource>) {
        self.sources.push(source);
    }

    pub fn with_sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn TranscriptSource>>,
    {
        self.sources.extend(sources);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Poll every source once
    pub async fn run(&self) -> PollOutcome {
        let reports: Arc<Mutex<Vec<DeviceReport>>> = Arc::new(Mutex::new(Vec::new()));
        let failures: Arc<Mutex<Vec<(String, Error)>>> = Arc::new(Mutex::new(Vec::new()));

        let handles = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let config = self.config.clone();
            let reports = Arc::clone(&reports);
            let failures = Arc::clone(&failures);
            let device = source.device_id().to_string();

            let handle = tokio::spawn(async move {
                match poll_one(source.as_ref(), config).await {
                    Ok(report) => reports.lock().push(report),
                    Err(e) => {
                        error!(device = %source.device_id(), error = %e, "Poll failed");
                        failures.lock().push((source.device_id().to_string(), e));
                    }
                }
            });
            (device, handle)
        });

        let (devices, handles): (Vec<_>, Vec<_>) = handles.unzip();
        for (device, joined) in devices.into_iter().zip(join_all(handles).await) {
            if let Err(e) = joined {
                error!(device = %device, error = %e, "Poll worker aborted");
                failures.lock().push((device, Error::Worker(e.to_string())));
            }
        }

        let mut reports = std::mem::take(&mut *reports.lock());
        reports.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        let mut failures = std::mem::take(&mut *failures.lock());
        failures.sort_by(|a, b| a.0.cmp(&b.0));

        info!(
            devices = self.sources.len(),
            reports = reports.len(),
            failures = failures.len(),
            "Poll pass complete"
        );
        PollOutcome { reports, failures }
    }
}

async fn poll_one(source: &dyn TranscriptSource, config: EngineConfig) -> Result<DeviceReport> {
    let lines = source.fetch().await?;
    let inspector = Inspector::new(source.kind(), config);
    Ok(inspector.inspect(source.device_id(), &lines))
}
