//! Error types for transfer operations

/// Errors that can occur while talking to the remote side
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The transfer client binary could not be started
    #[error("'{binary}' command not found. Install it and ensure it is on PATH.")]
    BinaryNotFound {
        /// The binary that was looked up
        binary: String,
    },

    /// The subprocess did not finish within its time limit
    #[error("Transfer timed out after {seconds}s")]
    Timeout {
        /// The limit that was exceeded
        seconds: u64,
    },

    /// Subprocess exited with non-zero status
    #[error("Command failed (exit code {code}): {}", stderr.trim())]
    CommandFailed {
        /// Exit code from the subprocess (-1 when killed by a signal)
        code: i32,
        /// Captured stdout output
        stdout: String,
        /// Captured stderr output
        stderr: String,
    },

    /// The subprocess reported success but the expected file is missing
    #[error("Transfer reported success but {path} was not created")]
    MissingOutput {
        /// The local path that should exist
        path: std::path::PathBuf,
    },

    /// I/O error while spawning or waiting for the subprocess
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Captured diagnostic text, if the subprocess produced any.
    pub fn diagnostics(&self) -> Option<String> {
        match self {
            Self::CommandFailed { stdout, stderr, .. } => {
                let mut text = String::new();
                if !stdout.trim().is_empty() {
                    text.push_str("--- stdout ---\n");
                    text.push_str(stdout.trim());
                    text.push('\n');
                }
                if !stderr.trim().is_empty() {
                    text.push_str("--- stderr ---\n");
                    text.push_str(stderr.trim());
                    text.push('\n');
                }
                (!text.is_empty()).then_some(text)
            }
            _ => None,
        }
    }
}

/// Result type alias for transfer operations
pub type Result<T> = std::result::Result<T, TransportError>;
