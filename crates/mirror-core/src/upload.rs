//! Upload with a single directory-creating retry

use std::path::Path;
use std::sync::Arc;

use mirror_transport::{RemoteTransport, TransportError};
use tracing::{debug, info, warn};

/// Result of an upload: how many transfers were attempted and the final error
#[derive(Debug)]
pub struct UploadReport {
    /// 1 for a direct success, 2 when the retry ran
    pub attempts: u32,
    /// Error from the last attempt, if it failed
    pub error: Option<TransportError>,
}

/// Sends local files to their remote directory
#[derive(Clone)]
pub struct UploadExecutor {
    transport: Arc<dyn RemoteTransport>,
}

impl UploadExecutor {
    pub fn new(transport: Arc<dyn RemoteTransport>) -> Self {
        Self { transport }
    }

    /// Upload `local` into `remote_dir`.
    ///
    /// A failed direct transfer is retried exactly once with the remote
    /// directory created first. There is no further retry.
    pub async fn upload(&self, local: &Path, remote_dir: &str, filename: &str) -> UploadReport {
        info!("Uploading: {}", filename);

        match self.transport.upload(local, remote_dir, false).await {
            Ok(()) => {
                return UploadReport {
                    attempts: 1,
                    error: None,
                };
            }
            Err(e) => {
                debug!(remote_dir, error = %e, "Direct upload failed");
                warn!("Upload failed, creating directory and retrying...");
            }
        }

        let error = self.transport.upload(local, remote_dir, true).await.err();
        UploadReport { attempts: 2, error }
    }
}
