//! Unified path management for analyst configuration files.
//!
//! ```text
//! ~/.config/analyst/           # Config directory (platform config dir)
//! ├── config.toml              # Client configuration
//! └── logs/                    # Rolling log files
//!     └── analyst.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "analyst";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform configuration directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find configuration directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for analyst.
pub struct AnalystPaths;

impl AnalystPaths {
    /// Returns the analyst configuration directory (e.g. `~/.config/analyst/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_config_dir() {
        // Headless environments may have no config dir at all.
        let Ok(config_dir) = AnalystPaths::config_dir() else {
            return;
        };
        assert!(config_dir.ends_with("analyst"));

        let config_file = AnalystPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(&config_dir));

        let logs_dir = AnalystPaths::logs_dir().unwrap();
        assert!(logs_dir.ends_with("logs"));
        assert!(logs_dir.starts_with(&config_dir));
    }
}
