//! Error types for the Analyst client.

use thiserror::Error;

/// A shared error type for the entire Analyst client.
///
/// Every failure the client can observe is folded into one of these variants.
/// Network and decoding failures are caught where they happen and logged;
/// validation failures are returned synchronously to the caller before any
/// request is issued.
#[derive(Error, Debug, Clone)]
pub enum AnalystError {
    /// The session store could not be reached or answered with a non-success status.
    #[error("Session store request failed{}: {message}", status_suffix(.status))]
    Http {
        status: Option<u16>,
        message: String,
    },

    /// A response body could not be decoded.
    #[error("Decode error: {format} - {message}")]
    Decode { format: String, message: String },

    /// A send was attempted with neither text nor a staged attachment.
    #[error("Nothing to send: type a message or attach a CSV file")]
    EmptyMessage,

    /// A file other than CSV was selected as an attachment.
    #[error("Only CSV files are allowed: '{name}' looks like {mime}")]
    NotCsv { name: String, mime: String },

    /// A chat operation was requested while another view is active.
    #[error("No chat is open; switch to the chat view first")]
    NoActiveChat,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A location string could not be interpreted.
    #[error("Invalid location '{input}': {reason}")]
    InvalidLocation { input: String, reason: String },
}

impl AnalystError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Http error
    pub fn http(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a JSON Decode error
    pub fn decode_json(message: impl Into<String>) -> Self {
        Self::Decode {
            format: "JSON".to_string(),
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an InvalidLocation error
    pub fn invalid_location(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocation {
            input: input.into(),
            reason: reason.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error was raised by local validation rather than I/O.
    ///
    /// Validation errors are rejected before any network call is made and
    /// leave all view state untouched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyMessage | Self::NotCsv { .. } | Self::NoActiveChat
        )
    }

    /// Check if this error came from talking to the session store.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Decode { .. })
    }

    /// Check if this is a NotCsv error
    pub fn is_not_csv(&self) -> bool {
        matches!(self, Self::NotCsv { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AnalystError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AnalystError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode_json(err.to_string())
    }
}

impl From<toml::de::Error> for AnalystError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML parse error: {err}"))
    }
}

impl From<url::ParseError> for AnalystError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {err}"))
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// A type alias for `Result<T, AnalystError>`.
pub type Result<T> = std::result::Result<T, AnalystError>;
