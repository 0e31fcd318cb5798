//! Remote transfer mechanism for Remote Mirror
//!
//! This crate defines the [`RemoteTransport`] capability used by the sync
//! engine and its production implementation, [`LftpTransport`], which drives
//! the `lftp` command-line client as a bounded subprocess:
//!
//! - Listing a remote directory
//! - Downloading a remote file to a local path
//! - Uploading a local file, optionally creating the remote directory first
//! - A startup connectivity check
//!
//! Every subprocess call runs under a timeout; a timed-out call is killed and
//! reported as a failure.

pub mod endpoint;
pub mod error;
pub mod lftp;
pub mod listing;

use std::path::Path;

use async_trait::async_trait;

pub use endpoint::{Endpoint, TransferSettings};
pub use error::{Result, TransportError};
pub use lftp::LftpTransport;
pub use listing::{entry_name, parse_listing};

/// Operations the sync engine needs from the remote side.
///
/// Remote directories are forward-slash paths. Implementations must bound
/// every call in time and report failures as errors rather than hanging.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Names of the entries in `remote_dir`.
    async fn list(&self, remote_dir: &str) -> Result<Vec<String>>;

    /// Copy `remote_dir/filename` to the local path `dest`.
    async fn download(&self, remote_dir: &str, filename: &str, dest: &Path) -> Result<()>;

    /// Copy `local` into `remote_dir` under its own file name.
    ///
    /// With `create_dir` set, the remote directory (and its parents) is
    /// created first, as part of the same call.
    async fn upload(&self, local: &Path, remote_dir: &str, create_dir: bool) -> Result<()>;

    /// Verify that the remote root can be listed.
    async fn check_connection(&self, remote_root: &str) -> Result<()>;
}
