//! Process-wide state for one running sync instance

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use mirror_fs::NormalizedPath;
use mirror_transport::Endpoint;

use crate::config::SyncConfig;
use crate::ignore::IgnoreMatcher;
use crate::mapping::SyncTarget;

/// Filenames the operator chose to always upload during this session.
///
/// Held in memory only. Entries are added by the conflict resolver; every
/// read and write goes through the lock.
#[derive(Debug, Default)]
pub struct SessionOverrides {
    names: Mutex<HashSet<String>>,
}

impl SessionOverrides {
    pub fn contains(&self, filename: &str) -> bool {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(filename)
    }

    /// Record an "always upload" decision. Returns false if already present.
    pub(crate) fn insert(&self, filename: &str) -> bool {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(filename.to_string())
    }
}

/// Per-path mutual exclusion so two events for the same file never
/// interleave their existence check, prompt and upload steps.
///
/// An entry lives only while some caller holds or waits on it.
#[derive(Debug, Default)]
pub(crate) struct PathLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl PathLocks {
    /// Wait until no other caller holds `key`, then hold it until the guard drops.
    pub(crate) async fn acquire(&self, key: &str) -> PathGuard<'_> {
        let guard = self.lock_for(key).lock_owned().await;
        PathGuard {
            locks: self,
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    fn lock_for(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(key.to_string()).or_default().clone()
    }

    /// Drop the entry for `key` once the map holds the only reference.
    fn release(&self, key: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Held lock on one remote path
#[derive(Debug)]
pub(crate) struct PathGuard<'a> {
    locks: &'a PathLocks,
    key: String,
    guard: Option<tokio::sync::OwnedMutexGuard<()>>,
}

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        // The owned guard holds a reference; release it before counting.
        self.guard.take();
        self.locks.release(&self.key);
    }
}

/// Immutable configuration plus session overrides
#[derive(Debug)]
pub struct SyncSession {
    endpoint: Endpoint,
    local_root: PathBuf,
    remote_root: NormalizedPath,
    ignore: IgnoreMatcher,
    overrides: SessionOverrides,
}

impl SyncSession {
    pub fn new<I, S>(endpoint: Endpoint, local_root: impl Into<PathBuf>, remote_root: &str, ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            endpoint,
            local_root: local_root.into(),
            remote_root: NormalizedPath::new(remote_root),
            ignore: IgnoreMatcher::new(ignore),
            overrides: SessionOverrides::default(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(
            config.endpoint(),
            config.directories.local.clone(),
            config.remote_root().as_str(),
            &config.ignore,
        )
    }

    /// Map a local path to its remote location.
    pub fn map(&self, path: &Path) -> Option<SyncTarget> {
        SyncTarget::resolve(&self.local_root, &self.remote_root, path)
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn local_root(&self) -> &Path {
        &self.local_root
    }

    pub fn remote_root(&self) -> &NormalizedPath {
        &self.remote_root
    }

    pub fn ignore(&self) -> &IgnoreMatcher {
        &self.ignore
    }

    pub fn overrides(&self) -> &SessionOverrides {
        &self.overrides
    }
}
