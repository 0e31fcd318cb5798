//! Sync configuration file
//!
//! The configuration names the remote endpoint, the two directory roots and
//! the ignore patterns. It is read once at startup; any problem here is
//! fatal, so every check reports which field is at fault.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mirror_fs::{ConfigStore, NormalizedPath};
use mirror_transport::endpoint::{DEFAULT_BINARY, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use mirror_transport::{Endpoint, TransferSettings};
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::{Error, Result};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sync_config.json";

fn default_port() -> u16 {
    21
}

fn default_binary() -> String {
    DEFAULT_BINARY.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

/// Remote endpoint section
#[derive(Debug, Clone, Deserialize)]
pub struct FtpSection {
    pub host: String,
    /// Accepts `21` as well as `"21"`
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
}

/// Directory roots section
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoriesSection {
    /// Remote root, forward-slash separated
    pub remote: String,
    /// Local root being watched
    pub local: PathBuf,
}

/// Transfer client section
#[derive(Debug, Clone, Deserialize)]
pub struct TransferSection {
    #[serde(default = "default_binary")]
    pub binary: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for TransferSection {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Complete sync configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub ftp: FtpSection,
    pub directories: DirectoriesSection,
    /// Ordered ignore patterns
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub transfer: TransferSection,
}

impl SyncConfig {
    /// Load, normalize and validate a configuration file.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigNotFound`] if the file does not exist
    /// - [`Error::Fs`] if it cannot be read or parsed
    /// - [`Error::InvalidConfig`] if a value is unusable
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut config: SyncConfig = ConfigStore::new().load(&NormalizedPath::new(path))?;
        config.normalize();
        config.validate()?;
        config.directories.local = mirror_fs::io::canonical_dir(&config.directories.local)?;
        Ok(config)
    }

    /// Trim ignore patterns and drop empty entries.
    pub fn normalize(&mut self) {
        self.ignore = self
            .ignore
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        self.ftp.host = self.ftp.host.trim().to_string();
    }

    /// Check the values a running session depends on.
    pub fn validate(&self) -> Result<()> {
        if self.ftp.host.is_empty() {
            return Err(Error::invalid_config("ftp.host", "must not be empty"));
        }
        if self.ftp.user.is_empty() {
            return Err(Error::invalid_config("ftp.user", "must not be empty"));
        }
        if self.ftp.port == 0 {
            return Err(Error::invalid_config("ftp.port", "must be between 1 and 65535"));
        }
        if self.directories.remote.trim().is_empty() {
            return Err(Error::invalid_config("directories.remote", "must not be empty"));
        }
        let local = &self.directories.local;
        if local.as_os_str().is_empty() {
            return Err(Error::invalid_config("directories.local", "must not be empty"));
        }
        if !local.is_dir() {
            return Err(Error::invalid_config(
                "directories.local",
                format!("{} is not an existing directory", local.display()),
            ));
        }
        if self.transfer.binary.trim().is_empty() {
            return Err(Error::invalid_config("transfer.binary", "must not be empty"));
        }
        if self.transfer.timeout_secs == 0 || self.transfer.connect_timeout_secs == 0 {
            return Err(Error::invalid_config(
                "transfer",
                "timeouts must be at least one second",
            ));
        }
        Ok(())
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            host: self.ftp.host.clone(),
            port: self.ftp.port,
            user: self.ftp.user.clone(),
            password: self.ftp.password.clone(),
        }
    }

    pub fn transfer_settings(&self) -> TransferSettings {
        TransferSettings {
            binary: self.transfer.binary.clone(),
            timeout: Duration::from_secs(self.transfer.timeout_secs),
            connect_timeout: Duration::from_secs(self.transfer.connect_timeout_secs),
        }
    }

    /// Remote root as a normalized path
    pub fn remote_root(&self) -> NormalizedPath {
        NormalizedPath::new(self.directories.remote.trim())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u16),
    Text(String),
}

fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    match PortValue::deserialize(deserializer)? {
        PortValue::Number(port) => Ok(port),
        PortValue::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid port '{}'", text))),
    }
}
