//! In-memory [`RemoteTransport`] for engine tests.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use mirror_fs::NormalizedPath;
use mirror_transport::{RemoteTransport, Result, TransportError};

/// One call made against a [`FakeTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    List { dir: String },
    Download { dir: String, filename: String },
    Upload { dir: String, filename: String, create_dir: bool },
    CheckConnection { root: String },
}

#[derive(Debug, Default)]
struct RemoteState {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    calls: Vec<TransportCall>,
    upload_failures: usize,
    fail_listing: bool,
    fail_downloads: bool,
    unreachable: bool,
}

impl RemoteState {
    fn add_dir(&mut self, dir: &str) {
        let mut current = Some(NormalizedPath::new(dir).trim_trailing_slash());
        while let Some(path) = current {
            if path.as_str().is_empty() {
                break;
            }
            current = path.parent();
            self.dirs.insert(path.as_str().to_string());
        }
    }
}

fn failure(stderr: &str) -> TransportError {
    TransportError::CommandFailed {
        code: 1,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

fn remote_path(dir: &str, filename: &str) -> String {
    NormalizedPath::new(dir).join(filename).as_str().to_string()
}

/// A remote tree held in memory.
///
/// Uploads into a directory that does not exist fail unless the caller asks
/// for it to be created, the way a real server rejects `cd` into a missing
/// directory.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::FakeTransport;
///
/// let remote = FakeTransport::new()
///     .with_dir("/www")
///     .with_file("/www/index.html", b"<html></html>");
/// remote.fail_next_uploads(1);
/// ```
#[derive(Debug, Default)]
pub struct FakeTransport {
    state: Mutex<RemoteState>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory and all of its parents.
    pub fn with_dir(self, dir: &str) -> Self {
        self.state.lock().unwrap().add_dir(dir);
        self
    }

    /// Register a file; its directory is created as well.
    pub fn with_file(self, path: &str, content: &[u8]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let path = NormalizedPath::new(path);
            if let Some(parent) = path.parent() {
                state.add_dir(parent.as_str());
            }
            state
                .files
                .insert(path.as_str().to_string(), content.to_vec());
        }
        self
    }

    /// Make the next `count` upload calls fail regardless of arguments.
    pub fn fail_next_uploads(&self, count: usize) {
        self.state.lock().unwrap().upload_failures = count;
    }

    /// Make every listing fail.
    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_listing = true;
    }

    /// Make every download fail.
    pub fn fail_downloads(&self) {
        self.state.lock().unwrap().fail_downloads = true;
    }

    /// Make the connectivity check fail.
    pub fn unreachable(&self) {
        self.state.lock().unwrap().unreachable = true;
    }

    /// Content of a remote file.
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn has_dir(&self, dir: &str) -> bool {
        self.state.lock().unwrap().dirs.contains(dir)
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn upload_count(&self) -> usize {
        self.count(|call| matches!(call, TransportCall::Upload { .. }))
    }

    pub fn download_count(&self) -> usize {
        self.count(|call| matches!(call, TransportCall::Download { .. }))
    }

    pub fn list_count(&self) -> usize {
        self.count(|call| matches!(call, TransportCall::List { .. }))
    }

    fn count(&self, predicate: impl Fn(&TransportCall) -> bool) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| predicate(call))
            .count()
    }
}

#[async_trait]
impl RemoteTransport for FakeTransport {
    async fn list(&self, remote_dir: &str) -> Result<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TransportCall::List {
            dir: remote_dir.to_string(),
        });
        if state.fail_listing || !state.dirs.contains(remote_dir) {
            return Err(failure("cd: Access failed: 550 No such directory"));
        }

        let prefix = remote_path(remote_dir, "");
        let prefix = if prefix.ends_with('/') { prefix } else { format!("{}/", prefix) };
        let entries = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter_map(|path| path.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(str::to_string)
            .collect();
        Ok(entries)
    }

    async fn download(&self, remote_dir: &str, filename: &str, dest: &Path) -> Result<()> {
        let content = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(TransportCall::Download {
                dir: remote_dir.to_string(),
                filename: filename.to_string(),
            });
            if state.fail_downloads {
                return Err(failure("get: Access failed: 550"));
            }
            state.files.get(&remote_path(remote_dir, filename)).cloned()
        };

        match content {
            Some(bytes) => fs::write(dest, bytes).map_err(TransportError::Io),
            None => Err(failure("get: Access failed: 550 No such file")),
        }
    }

    async fn upload(&self, local: &Path, remote_dir: &str, create_dir: bool) -> Result<()> {
        let filename = local
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut state = self.state.lock().unwrap();
        state.calls.push(TransportCall::Upload {
            dir: remote_dir.to_string(),
            filename: filename.clone(),
            create_dir,
        });

        if state.upload_failures > 0 {
            state.upload_failures -= 1;
            return Err(failure("put: Access failed: 553"));
        }
        if create_dir {
            state.add_dir(remote_dir);
        }
        if !state.dirs.contains(remote_dir) {
            return Err(failure("cd: Access failed: 550 No such directory"));
        }

        let content = fs::read(local).map_err(TransportError::Io)?;
        state.files.insert(remote_path(remote_dir, &filename), content);
        Ok(())
    }

    async fn check_connection(&self, remote_root: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TransportCall::CheckConnection {
            root: remote_root.to_string(),
        });
        if state.unreachable {
            return Err(failure("Fatal error: max-retries exceeded"));
        }
        Ok(())
    }
}
