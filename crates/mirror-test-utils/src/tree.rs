//! [`TestTree`]: a temporary local root for sync scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use mirror_core::{ChangeEvent, SyncSession};
use mirror_fs::io::canonical_dir;
use mirror_fs::is_comparison_artifact;
use mirror_transport::Endpoint;
use tempfile::TempDir;

/// A temporary local directory standing in for the synced root.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// let event = tree.write("css/site.css", "body {}");
/// let session = tree.session("/www", &["*.swp"]);
/// ```
pub struct TestTree {
    temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = canonical_dir(temp_dir.path()).unwrap();
        Self { temp_dir, root }
    }

    /// Root of the local tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative`.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a file (creating parent directories) and return its change event.
    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> ChangeEvent {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        ChangeEvent::file(path)
    }

    pub fn read(&self, relative: &str) -> Vec<u8> {
        fs::read(self.path(relative))
            .unwrap_or_else(|e| panic!("Could not read {}: {}", relative, e))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    /// Session rooted at this tree with a dummy endpoint.
    pub fn session(&self, remote_root: &str, ignore: &[&str]) -> SyncSession {
        let endpoint = Endpoint {
            host: "ftp.example.test".to_string(),
            port: 21,
            user: "tester".to_string(),
            password: "secret".to_string(),
        };
        SyncSession::new(endpoint, self.root.clone(), remote_root, ignore)
    }

    /// Relative paths of every comparison file left in the tree.
    pub fn artifacts(&self) -> Vec<String> {
        let mut found = Vec::new();
        collect_artifacts(&self.root, &self.root, &mut found);
        found.sort();
        found
    }

    /// Assert that no comparison file remains anywhere in the tree.
    ///
    /// # Panics
    /// Panics listing the leftover files.
    pub fn assert_no_artifacts(&self) {
        let leftover = self.artifacts();
        assert!(leftover.is_empty(), "Comparison files left behind: {:?}", leftover);
    }

    /// Keep the directory alive for the lifetime of the tree.
    pub fn temp_dir(&self) -> &TempDir {
        &self.temp_dir
    }
}

fn collect_artifacts(root: &Path, dir: &Path, found: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_artifacts(root, &path, found);
        } else if is_comparison_artifact(&entry.file_name().to_string_lossy()) {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            found.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
}
