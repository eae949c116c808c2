//! SAN PM Inspector
//!
//! Inspects captured CLI transcripts or SNMP walk dumps and prints one
//! JSON report per device on stdout.
//!
//! ```text
//! san-pm-inspector --kind switch 'captures/sw*.log'
//! san-pm-inspector --kind array --config inspector.yaml captures/oceanstor01.log
//! san-pm-inspector --kind switch-mib walks/sw01.walk
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use san_pm_inspector::{
    DeviceKind, EngineConfig, Error, FileTranscriptSource, HealthStatus, PollRunner, Result,
    TranscriptSource,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// SAN PM Inspector - health inspection of SAN switches and storage arrays
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transcript files or glob patterns
    #[arg(required = true)]
    paths: Vec<String>,

    /// Device kind (switch, array, switch-mib, array-mib, xiv-mib)
    #[arg(long, env = "DEVICE_KIND", default_value = "switch")]
    kind: DeviceKind,

    /// YAML engine configuration
    #[arg(long, env = "INSPECTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Login name printed in prompts (overrides config)
    #[arg(long, env = "PROMPT_USERNAME")]
    username: Option<String>,

    /// Prompts carry a virtual-fabric segment (overrides config)
    #[arg(long, env = "VIRTUAL_FABRIC")]
    virtual_fabric: bool,

    /// Pretty-print JSON reports
    #[arg(long)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    info!("Starting SAN PM Inspector");
    info!("  Version: {}", san_pm_inspector::VERSION);
    info!("  Device kind: {}", args.kind);

    let config = load_config(&args)?;
    let paths = expand_paths(&args.paths)?;
    if paths.is_empty() {
        return Err(Error::PathPattern(format!(
            "No transcript matched {}",
            args.paths.join(", ")
        )));
    }
    info!("  Transcripts: {}", paths.len());

    let sources = paths.into_iter().map(|path| {
        Arc::new(FileTranscriptSource::new(path, args.kind)) as Arc<dyn TranscriptSource>
    });
    let runner = PollRunner::new(config).with_sources(sources);
    let outcome = runner.run().await;

    for report in &outcome.reports {
        let json = if args.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        println!("{}", json);
    }

    for (device, err) in &outcome.failures {
        error!(device = %device, "Inspection failed: {}", err);
    }
    let failing = outcome
        .reports
        .iter()
        .filter(|r| r.status == HealthStatus::Fail)
        .count();
    if failing > 0 {
        warn!("{} of {} devices failed inspection", failing, outcome.reports.len());
    }

    info!("Inspection run complete");
    Ok(())
}

// =============================================================================
// Configuration
// =============================================================================

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_yaml_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(username) = &args.username {
        config.prompt.username = username.clone();
    }
    if args.virtual_fabric {
        config.prompt.virtual_fabric = true;
    }
    config.validate()?;
    Ok(config)
}

fn expand_paths(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let entries = glob::glob(pattern)
            .map_err(|e| Error::PathPattern(format!("{}: {}", pattern, e)))?;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable path: {}", e),
            }
        }
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // stdout carries the reports
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
