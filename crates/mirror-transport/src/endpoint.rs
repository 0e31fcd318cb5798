//! Connection and subprocess settings

use std::fmt;
use std::time::Duration;

/// Default client binary
pub const DEFAULT_BINARY: &str = "lftp";
/// Default limit for a single transfer call
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Default network timeout used for the startup check and lftp's own retries
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;

/// Where and as whom to connect
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// How the client subprocess is run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSettings {
    /// Client binary name or path
    pub binary: String,
    /// Upper bound for list, download and upload calls
    pub timeout: Duration,
    /// Network timeout handed to the client; also bounds the startup check
    pub connect_timeout: Duration,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}
