//! Per-event sync orchestration
//!
//! [`SyncEngine::handle`] takes one change event through the full decision
//! flow: noise filtering, path mapping, ignore rules, the optional remote
//! conflict check, and finally the upload. Every failure along the way is
//! logged and reported as a [`SyncOutcome`]; nothing is returned as an error.

use std::fmt;
use std::sync::Arc;

use mirror_fs::{io, is_comparison_artifact};
use mirror_transport::RemoteTransport;
use tracing::{debug, error, info, warn};

use crate::conflict::{ConflictDecision, ConflictResolver, DecisionProvider};
use crate::mapping::{ChangeEvent, SyncTarget};
use crate::probe::RemoteProbe;
use crate::session::{PathLocks, SyncSession};
use crate::upload::UploadExecutor;

/// Whether remote content is checked before uploading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Upload every change without looking at the remote side
    #[default]
    Direct,
    /// Compare with the remote file and resolve conflicts first
    CheckConflicts,
}

impl SyncMode {
    pub fn from_flag(check_conflicts: bool) -> Self {
        if check_conflicts {
            Self::CheckConflicts
        } else {
            Self::Direct
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "standard"),
            Self::CheckConflicts => write!(f, "conflict resolution"),
        }
    }
}

/// How a single change event was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Directory events are not synced
    Directory,
    /// The event was for one of our own comparison files
    SelfArtifact,
    /// The path is not under the local root
    OutsideRoot,
    /// The file was gone by the time the event was handled
    Vanished,
    /// An ignore pattern matched
    Ignored,
    /// Remote content already matches; nothing uploaded
    Identical,
    /// Operator chose to handle the conflict manually
    Cancelled,
    /// Local file replaced with remote content
    AdoptedRemote,
    /// Upload succeeded
    Uploaded { attempts: u32 },
    /// Both upload attempts failed
    UploadFailed { message: String },
    /// Conflict resolution could not be completed
    ResolveFailed { message: String },
}

impl SyncOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::UploadFailed { .. } | Self::ResolveFailed { .. })
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => write!(f, "directory skipped"),
            Self::SelfArtifact => write!(f, "comparison file skipped"),
            Self::OutsideRoot => write!(f, "outside local root"),
            Self::Vanished => write!(f, "file no longer exists"),
            Self::Ignored => write!(f, "ignored"),
            Self::Identical => write!(f, "identical to remote"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::AdoptedRemote => write!(f, "local file replaced with remote"),
            Self::Uploaded { attempts } => write!(f, "uploaded ({} attempt(s))", attempts),
            Self::UploadFailed { message } => write!(f, "upload failed: {}", message),
            Self::ResolveFailed { message } => write!(f, "conflict resolution failed: {}", message),
        }
    }
}

/// Result of the conflict check that precedes an upload
enum Gate {
    Upload,
    Stop(SyncOutcome),
}

/// Handles change events for one sync session
pub struct SyncEngine {
    session: SyncSession,
    mode: SyncMode,
    probe: RemoteProbe,
    resolver: ConflictResolver,
    uploader: UploadExecutor,
    locks: PathLocks,
}

impl SyncEngine {
    pub fn new(
        session: SyncSession,
        mode: SyncMode,
        transport: Arc<dyn RemoteTransport>,
        decider: Arc<dyn DecisionProvider>,
    ) -> Self {
        let probe = RemoteProbe::new(transport.clone());
        Self {
            session,
            mode,
            resolver: ConflictResolver::new(probe.clone(), decider),
            probe,
            uploader: UploadExecutor::new(transport),
            locks: PathLocks::default(),
        }
    }

    pub fn session(&self) -> &SyncSession {
        &self.session
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Handle one change event from start to finish.
    ///
    /// Events for the same remote path are serialized; unrelated paths do
    /// not wait on each other.
    pub async fn handle(&self, event: ChangeEvent) -> SyncOutcome {
        if event.is_dir {
            return SyncOutcome::Directory;
        }
        let is_artifact = event
            .path
            .file_name()
            .is_some_and(|name| is_comparison_artifact(&name.to_string_lossy()));
        if is_artifact {
            return SyncOutcome::SelfArtifact;
        }

        let Some(target) = self.session.map(&event.path) else {
            warn!(
                "Ignoring event outside {}: {}",
                self.session.local_root().display(),
                event.path.display()
            );
            return SyncOutcome::OutsideRoot;
        };

        if let Some(pattern) = self.session.ignore().matching_pattern(
            target.relative.as_str(),
            &target.filename,
            &target.local_path,
        ) {
            info!("Skipping ignored path: {} (pattern '{}')", target.relative, pattern);
            return SyncOutcome::Ignored;
        }

        let remote_path = target.remote_path();
        let _guard = self.locks.acquire(remote_path.as_str()).await;

        if !target.local_path.is_file() {
            debug!(path = %target.local_path.display(), "File vanished before sync");
            return SyncOutcome::Vanished;
        }

        info!("Processing: {} -> {}", target.relative, remote_path);

        if self.mode == SyncMode::CheckConflicts
            && let Gate::Stop(outcome) = self.check_remote(&target).await
        {
            return outcome;
        }

        self.upload(&target).await
    }

    async fn check_remote(&self, target: &SyncTarget) -> Gate {
        let filename = target.filename.as_str();
        let remote_dir = target.remote_dir.as_str();

        if self.session.overrides().contains(filename) {
            info!("Auto-overriding {} (session choice)", filename);
            return Gate::Upload;
        }

        if !self.probe.exists(remote_dir, filename).await {
            info!("No remote file found. Proceeding with upload...");
            return Gate::Upload;
        }

        info!("Remote file exists. Downloading to check for differences...");
        let Some(artifact) = self
            .probe
            .fetch(remote_dir, filename, &target.local_path)
            .await
        else {
            warn!("Failed to download remote file for comparison. Proceeding with upload...");
            return Gate::Upload;
        };

        match io::files_identical(&target.local_path, artifact.path()) {
            Ok(true) => {
                artifact.discard();
                info!("Files are identical, no conflict. Skipping upload for: {}", filename);
                return Gate::Stop(SyncOutcome::Identical);
            }
            Ok(false) => info!("Files differ. Resolving conflict..."),
            Err(e) => warn!("Error comparing files: {}. Treating as a conflict", e),
        }

        match self
            .resolver
            .resolve(target, Some(artifact), self.session.overrides())
            .await
        {
            Ok(decision) if decision.proceeds_to_upload() => {
                if decision == ConflictDecision::SaveRemoteCopy {
                    info!("Remote copy saved. Now uploading local version...");
                }
                Gate::Upload
            }
            Ok(ConflictDecision::AdoptRemote) => Gate::Stop(SyncOutcome::AdoptedRemote),
            Ok(_) => Gate::Stop(SyncOutcome::Cancelled),
            Err(e) => {
                error!("Could not resolve conflict for {}: {}", filename, e);
                Gate::Stop(SyncOutcome::ResolveFailed {
                    message: e.to_string(),
                })
            }
        }
    }

    async fn upload(&self, target: &SyncTarget) -> SyncOutcome {
        let filename = target.filename.as_str();
        let report = self
            .uploader
            .upload(&target.local_path, target.remote_dir.as_str(), filename)
            .await;

        match report.error {
            None if report.attempts > 1 => {
                info!("Successfully uploaded after creating directory: {}", filename);
                SyncOutcome::Uploaded {
                    attempts: report.attempts,
                }
            }
            None => {
                info!("Successfully uploaded: {}", filename);
                SyncOutcome::Uploaded {
                    attempts: report.attempts,
                }
            }
            Some(e) => {
                error!("Failed to upload {}: {}", filename, e);
                if let Some(details) = e.diagnostics() {
                    error!("{}", details.trim_end());
                }
                SyncOutcome::UploadFailed {
                    message: e.to_string(),
                }
            }
        }
    }
}
