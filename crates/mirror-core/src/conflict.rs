//! Conflict resolution between divergent local and remote content
//!
//! A conflict moves through a fixed sequence of states:
//!
//! ```text
//! Probing -> Presenting -> AwaitingDecision -> Executing -> Done
//! ```
//!
//! Presenting is skipped when no remote copy could be fetched.
//!
//! The decision itself comes from a [`DecisionProvider`], which is the
//! interactive prompt in the CLI and a scripted queue in tests.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use mirror_fs::remote_copy_name;
use tracing::{debug, info, warn};

use crate::diff::{DiffView, show_diff};
use crate::mapping::SyncTarget;
use crate::probe::{ComparisonArtifact, RemoteProbe};
use crate::session::SessionOverrides;
use crate::Result;

/// The operator's answer to a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictDecision {
    /// Overwrite the remote file and stop asking for this filename
    UploadLocal,
    /// Replace the local file with the remote content
    AdoptRemote,
    /// Leave both sides alone
    Cancel,
    /// Keep the remote content beside the local file, then upload
    SaveRemoteCopy,
}

impl ConflictDecision {
    /// All decisions in menu order
    pub const ALL: [Self; 4] = [
        Self::UploadLocal,
        Self::AdoptRemote,
        Self::Cancel,
        Self::SaveRemoteCopy,
    ];

    /// Parse a menu choice (`"1"` to `"4"`, surrounding whitespace ignored).
    pub fn from_choice(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::UploadLocal),
            "2" => Some(Self::AdoptRemote),
            "3" => Some(Self::Cancel),
            "4" => Some(Self::SaveRemoteCopy),
            _ => None,
        }
    }

    /// Menu key for this decision
    pub fn choice(self) -> char {
        match self {
            Self::UploadLocal => '1',
            Self::AdoptRemote => '2',
            Self::Cancel => '3',
            Self::SaveRemoteCopy => '4',
        }
    }

    /// Menu text for this decision
    pub fn description(self) -> &'static str {
        match self {
            Self::UploadLocal => "Override remote file (upload local) - remember for session",
            Self::AdoptRemote => "Override local file (download remote)",
            Self::Cancel => "Cancel and handle manually",
            Self::SaveRemoteCopy => "Download a copy (save remote as *-remote.*)",
        }
    }

    /// Whether the local file should be uploaded after this decision.
    pub fn proceeds_to_upload(self) -> bool {
        matches!(self, Self::UploadLocal | Self::SaveRemoteCopy)
    }
}

/// Source of conflict decisions.
///
/// `diff` is `None` when the remote content could not be fetched.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    async fn decide(&self, filename: &str, diff: Option<&DiffView>) -> Result<ConflictDecision>;
}

/// Steps of a single conflict resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    Probing,
    Presenting,
    AwaitingDecision,
    Executing(ConflictDecision),
    Done,
}

impl fmt::Display for ResolveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probing => write!(f, "probing"),
            Self::Presenting => write!(f, "presenting"),
            Self::AwaitingDecision => write!(f, "awaiting decision"),
            Self::Executing(decision) => write!(f, "executing {:?}", decision),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Drives one conflict from staging to a carried-out decision
pub struct ConflictResolver {
    probe: RemoteProbe,
    decider: Arc<dyn DecisionProvider>,
}

impl ConflictResolver {
    pub fn new(probe: RemoteProbe, decider: Arc<dyn DecisionProvider>) -> Self {
        Self { probe, decider }
    }

    /// Resolve a conflict for `target`.
    ///
    /// `staged` is a remote copy already fetched by the caller; without one
    /// the resolver fetches its own. Whatever the outcome, no comparison
    /// file is left on disk when this returns.
    pub async fn resolve(
        &self,
        target: &SyncTarget,
        staged: Option<ComparisonArtifact>,
        overrides: &SessionOverrides,
    ) -> Result<ConflictDecision> {
        let filename = target.filename.as_str();
        info!("Conflict detected for {}", filename);

        transition(filename, ResolveState::Probing);
        let artifact = match staged {
            Some(artifact) => Some(artifact),
            None => {
                self.probe
                    .fetch(target.remote_dir.as_str(), filename, &target.local_path)
                    .await
            }
        };

        let diff = match &artifact {
            Some(artifact) => {
                transition(filename, ResolveState::Presenting);
                Some(show_diff(&target.local_path, artifact.path(), filename))
            }
            None => None,
        };

        transition(filename, ResolveState::AwaitingDecision);
        let decision = self.decider.decide(filename, diff.as_ref()).await?;

        transition(filename, ResolveState::Executing(decision));
        execute(decision, target, artifact, overrides)?;

        transition(filename, ResolveState::Done);
        Ok(decision)
    }
}

fn transition(filename: &str, state: ResolveState) {
    debug!(filename, %state, "Conflict state");
}

fn execute(
    decision: ConflictDecision,
    target: &SyncTarget,
    artifact: Option<ComparisonArtifact>,
    overrides: &SessionOverrides,
) -> Result<()> {
    let filename = target.filename.as_str();
    match decision {
        ConflictDecision::UploadLocal => {
            overrides.insert(filename);
            info!("Will always override {} for this session", filename);
            if let Some(artifact) = artifact {
                artifact.discard();
            }
        }
        ConflictDecision::AdoptRemote => match artifact {
            Some(artifact) => {
                artifact.replace_local(&target.local_path)?;
                info!("Local file updated with remote content: {}", filename);
            }
            None => warn!("No remote copy of {} available; local file left unchanged", filename),
        },
        ConflictDecision::Cancel => {
            if let Some(artifact) = artifact {
                artifact.discard();
            }
            info!("Skipping {} - handle manually", filename);
        }
        ConflictDecision::SaveRemoteCopy => match artifact {
            Some(artifact) => {
                let copy_name = remote_copy_name(filename);
                let dest = target.local_dir().join(&copy_name);
                if dest.exists() {
                    warn!("Replacing earlier remote copy: {}", copy_name);
                }
                artifact.keep_as(&dest)?;
                info!("Remote copy saved as: {}", copy_name);
            }
            None => warn!("No remote copy of {} available to save", filename),
        },
    }
    Ok(())
}
