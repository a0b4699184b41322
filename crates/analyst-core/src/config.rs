use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Address of the session store used when nothing else is configured.
pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:8000";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Root of `config.toml`.
///
/// ```toml
/// [session_store]
/// base_url = "http://127.0.0.1:8000"
///
/// [logging]
/// level = "debug"
/// directory = "/tmp/analyst-logs"
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default)]
    pub session_store: SessionStoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionStoreConfig {
    #[serde(default = "default_store_url")]
    pub base_url: String,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_store_url(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `analyst_application=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files; the platform log directory when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_store_url() -> String {
    DEFAULT_STORE_URL.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
