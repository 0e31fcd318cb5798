//! Error types for mirror-cli

use mirror_transport::TransportError;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end the process with exit code 1
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from mirror-core
    #[error(transparent)]
    Core(#[from] mirror_core::Error),

    /// Transfer client could not be used at all
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Startup connectivity test failed
    #[error("Connection test to {endpoint} failed: {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: TransportError,
    },

    /// Filesystem watcher could not be started
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Captured transfer client output worth showing after the error line.
    pub fn diagnostics(&self) -> Option<String> {
        match self {
            Self::Transport(e) | Self::Connection { source: e, .. } => e.diagnostics(),
            _ => None,
        }
    }
}
