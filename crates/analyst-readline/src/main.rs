use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use analyst_core::navigation::Location;
use analyst_core::session::{SessionIdMinter, SessionStore, UuidSessionIdMinter};
use analyst_infrastructure::{ConfigService, HttpSessionStore};

mod command;
mod helper;
mod logging;
mod render;
mod repl;

#[derive(Parser)]
#[command(name = "analyst")]
#[command(about = "Analyst - chat with a remote data-analysis session store", long_about = None)]
struct Cli {
    /// Location to open, e.g. `/notebook` or `/?chat=<session id>`
    location: Option<String>,

    /// Base URL of the session store (overrides the config file)
    #[arg(long, value_name = "URL")]
    store_url: Option<String>,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `analyst_application=trace`
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let mut config = config_service
        .load()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    if let Some(url) = cli.store_url {
        config.session_store.base_url = url;
    }

    let _log_guard = logging::init(&config.logging, cli.log_level.as_deref())?;
    tracing::info!(
        "[Analyst] Using session store at {}",
        config.session_store.base_url
    );

    let initial = match cli.location.as_deref() {
        Some(raw) => Location::parse(raw)?,
        None => Location::default(),
    };

    let store: Arc<dyn SessionStore> =
        Arc::new(HttpSessionStore::new(&config.session_store.base_url)?);
    let minter: Arc<dyn SessionIdMinter> = Arc::new(UuidSessionIdMinter);

    repl::run(initial, store, minter).await
}
