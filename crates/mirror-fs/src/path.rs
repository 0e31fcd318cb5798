//! Normalized path handling for local and remote paths

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Local paths are converted back to platform-native form only at I/O
/// boundaries. Remote paths never leave this form, since the transfer
/// protocol always uses `/` regardless of the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    ///
    /// An empty segment returns the path unchanged; an empty base returns
    /// the segment. Exactly one `/` separates the two parts.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let segment = segment.trim_start_matches('/');
        if segment.is_empty() {
            return self.clone();
        }
        if self.inner.is_empty() {
            return Self {
                inner: segment.to_string(),
            };
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner: joined }
    }

    /// Drop trailing slashes, keeping a lone `/` intact.
    pub fn trim_trailing_slash(&self) -> Self {
        let trimmed = self.inner.trim_end_matches('/');
        if trimmed.is_empty() && self.inner.starts_with('/') {
            return Self {
                inner: "/".to_string(),
            };
        }
        Self {
            inner: trimmed.to_string(),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        let (_, ext) = split_extension(self.file_name()?);
        ext.strip_prefix('.')
    }
}

/// Split a file name into stem and extension (extension keeps its dot).
///
/// The extension starts at the last dot, unless that dot is the first
/// character: `.env` has no extension, `archive.tar.gz` splits into
/// `archive.tar` and `.gz`.
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 && !filename[..idx].chars().all(|c| c == '.') => {
            filename.split_at(idx)
        }
        _ => (filename, ""),
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_extension_plain() {
        assert_eq!(split_extension("notes.txt"), ("notes", ".txt"));
    }

    #[test]
    fn split_extension_multiple_dots() {
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
    }

    #[test]
    fn split_extension_dotfile() {
        assert_eq!(split_extension(".env"), (".env", ""));
        assert_eq!(split_extension("..config"), ("..config", ""));
    }

    #[test]
    fn split_extension_none() {
        assert_eq!(split_extension("Makefile"), ("Makefile", ""));
    }

    #[test]
    fn trim_trailing_slash_keeps_root() {
        assert_eq!(NormalizedPath::new("/").trim_trailing_slash().as_str(), "/");
        assert_eq!(
            NormalizedPath::new("/www/").trim_trailing_slash().as_str(),
            "/www"
        );
    }
}
