//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `config.toml` (by default
//! `~/.config/analyst/config.toml`).

use analyst_core::config::ClientConfig;
use analyst_core::error::{AnalystError, Result};
use std::path::{Path, PathBuf};

use crate::paths::AnalystPaths;

/// Reads the client configuration file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Creates a service for the platform default config file.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the platform config directory is unknown.
    pub fn new() -> Result<Self> {
        let path = AnalystPaths::config_file().map_err(|e| AnalystError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates a service for an explicit config file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// A missing or empty file yields the defaults.
    ///
    /// # Errors
    ///
    /// - `Io` if the file exists but cannot be read
    /// - `Config` if the file is not valid TOML for [`ClientConfig`]
    pub fn load(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[Config] No config file at {}, using defaults",
                self.path.display()
            );
            return Ok(ClientConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }

        toml::from_str(&content).map_err(|e| {
            AnalystError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}
