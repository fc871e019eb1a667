use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Overrides the log filter, e.g. `DNS_SWITCH_LOG=dns_switch=trace`.
pub const LOG_ENV: &str = "DNS_SWITCH_LOG";

/// Output destination for tracing
pub enum TracingOutput {
    /// Stderr, so it does not interleave with the menu on stdout
    Stderr,
    /// Append to a log file
    File(PathBuf),
}

/// Initialize tracing based on configuration
/// Priority: DNS_SWITCH_LOG env > verbose flag > default (warn)
pub fn init_tracing(verbose: bool, output: TracingOutput) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(format!("dns_switch={}", level))
    });

    match output {
        TracingOutput::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
        TracingOutput::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
    }

    Ok(())
}
