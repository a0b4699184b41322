//! Tracing bootstrap.
//!
//! Log output goes to a daily rolling file so it never interleaves with the
//! REPL on the terminal.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use analyst_core::config::LoggingConfig;
use analyst_infrastructure::AnalystPaths;

const LOG_FILE_PREFIX: &str = "analyst.log";

/// Installs the global subscriber.
///
/// The filter comes from `level_override` (the `--log-level` flag), then
/// `RUST_LOG`, then the configured level. Keep the returned guard alive for
/// the lifetime of the program or buffered lines are lost.
pub fn init(config: &LoggingConfig, level_override: Option<&str>) -> Result<WorkerGuard> {
    let directory = match &config.directory {
        Some(dir) => dir.clone(),
        None => AnalystPaths::logs_dir()?,
    };
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let filter = match level_override {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?,
    };

    let appender = tracing_appender::rolling::daily(&directory, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("[Logging] Writing logs to {}", directory.display());
    Ok(guard)
}
