//! Remote existence checks and staging of remote content

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mirror_fs::{artifact_name, io};
use mirror_transport::RemoteTransport;
use tracing::{debug, warn};

/// A local copy of remote content, staged next to the file it mirrors.
///
/// The file is deleted when the guard is dropped unless it was consumed by
/// [`replace_local`](Self::replace_local) or [`keep_as`](Self::keep_as).
#[derive(Debug)]
pub struct ComparisonArtifact {
    path: PathBuf,
    armed: bool,
}

impl ComparisonArtifact {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the staged file now.
    pub fn discard(mut self) {
        self.armed = false;
        if let Err(e) = io::remove_if_exists(&self.path) {
            warn!("Could not remove comparison file: {}", e);
        }
    }

    /// Move the staged content over `dest` in one rename.
    ///
    /// On failure `dest` is unchanged and the staged file is still removed
    /// when the guard drops.
    pub fn replace_local(mut self, dest: &Path) -> mirror_fs::Result<()> {
        io::replace_file(&self.path, dest)?;
        self.armed = false;
        Ok(())
    }

    /// Keep the staged content under a new name.
    pub fn keep_as(self, dest: &Path) -> mirror_fs::Result<()> {
        self.replace_local(dest)
    }
}

impl Drop for ComparisonArtifact {
    fn drop(&mut self) {
        if self.armed
            && let Err(e) = io::remove_if_exists(&self.path)
        {
            warn!("Could not remove comparison file: {}", e);
        }
    }
}

/// Queries the remote side on behalf of the engine
#[derive(Clone)]
pub struct RemoteProbe {
    transport: Arc<dyn RemoteTransport>,
}

impl RemoteProbe {
    pub fn new(transport: Arc<dyn RemoteTransport>) -> Self {
        Self { transport }
    }

    /// Whether `filename` is an entry of `remote_dir`.
    ///
    /// Any transport failure counts as "does not exist".
    pub async fn exists(&self, remote_dir: &str, filename: &str) -> bool {
        match self.transport.list(remote_dir).await {
            Ok(entries) => {
                let found = entries.iter().any(|entry| entry == filename);
                debug!(remote_dir, filename, found, "Checked remote listing");
                found
            }
            Err(e) => {
                warn!(
                    "Could not list remote directory {}: {}. Assuming '{}' is absent",
                    remote_dir, e, filename
                );
                false
            }
        }
    }

    /// Download `remote_dir/filename` into a comparison file beside `local_path`.
    ///
    /// Returns `None` if the transfer fails or leaves nothing on disk; any
    /// partial file is removed.
    pub async fn fetch(
        &self,
        remote_dir: &str,
        filename: &str,
        local_path: &Path,
    ) -> Option<ComparisonArtifact> {
        let dir = local_path.parent().unwrap_or_else(|| Path::new("."));
        let staged = ComparisonArtifact::new(dir.join(artifact_name(filename)));

        match self.transport.download(remote_dir, filename, staged.path()).await {
            Ok(()) if staged.path().is_file() => {
                debug!(path = %staged.path().display(), "Fetched remote copy");
                Some(staged)
            }
            Ok(()) => {
                warn!("Download of '{}' produced no file", filename);
                None
            }
            Err(e) => {
                warn!("Could not download remote '{}': {}", filename, e);
                if let Some(details) = e.diagnostics() {
                    debug!("{}", details);
                }
                None
            }
        }
    }
}
