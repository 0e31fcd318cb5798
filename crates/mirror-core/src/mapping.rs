//! Change events and the local-to-remote path mapping

use std::path::{Path, PathBuf};

use mirror_fs::NormalizedPath;

/// A local create/modify notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Absolute local path
    pub path: PathBuf,
    /// Whether the path is a directory
    pub is_dir: bool,
}

impl ChangeEvent {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// Where a changed local file lives on the remote side.
///
/// Derived on demand from the two roots and the local path; nothing here is
/// cached between events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    /// Absolute local path
    pub local_path: PathBuf,
    /// Path relative to the local root, forward-slash separated
    pub relative: NormalizedPath,
    /// Remote directory the file belongs in
    pub remote_dir: NormalizedPath,
    /// Final path component
    pub filename: String,
}

impl SyncTarget {
    /// Map `path` under `local_root` onto `remote_root`.
    ///
    /// Returns `None` when `path` is not strictly inside `local_root`.
    pub fn resolve(local_root: &Path, remote_root: &NormalizedPath, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(local_root).ok()?;
        let filename = relative.file_name()?.to_string_lossy().to_string();

        let rel_dir = relative
            .parent()
            .map(NormalizedPath::new)
            .unwrap_or_else(|| NormalizedPath::new(""));
        let remote_dir = if rel_dir.as_str().is_empty() {
            remote_root.trim_trailing_slash()
        } else {
            remote_root.join(rel_dir.as_str())
        };

        Some(Self {
            local_path: path.to_path_buf(),
            relative: NormalizedPath::new(relative),
            remote_dir,
            filename,
        })
    }

    /// Full remote path of the file
    pub fn remote_path(&self) -> NormalizedPath {
        self.remote_dir.join(&self.filename)
    }

    /// Directory holding the local file
    pub fn local_dir(&self) -> &Path {
        self.local_path.parent().unwrap_or_else(|| Path::new("."))
    }
}
