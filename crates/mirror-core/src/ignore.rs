//! Ignore patterns for changed paths
//!
//! Three kinds of pattern are recognised, tried in configuration order:
//!
//! - `dir/` (trailing separator): the directory and everything beneath it
//! - shell globs (`*.swp`, `build/*.o`): matched against the relative path
//!   and against the bare file name
//! - absolute paths (`/home/me/site/tmp`): prefix of the absolute path
//!
//! A pattern that fails to compile as a glob simply never matches as one.

use std::path::Path;

use globset::{Glob, GlobMatcher};
use tracing::warn;

#[derive(Debug, Clone)]
struct IgnoreRule {
    pattern: String,
    /// Set for `dir/` patterns
    directory: Option<String>,
    glob: Option<GlobMatcher>,
    absolute: bool,
}

impl IgnoreRule {
    fn compile(pattern: &str) -> Self {
        let directory = pattern
            .ends_with(['/', '\\'])
            .then(|| pattern.replace('\\', "/").trim_end_matches('/').to_string());

        let glob = if directory.is_some() {
            None
        } else {
            match Glob::new(pattern) {
                Ok(glob) => Some(glob.compile_matcher()),
                Err(e) => {
                    warn!(pattern, error = %e, "Ignore pattern is not a valid glob");
                    None
                }
            }
        };

        Self {
            pattern: pattern.to_string(),
            directory,
            glob,
            absolute: Path::new(pattern).is_absolute(),
        }
    }

    fn matches(&self, relative: &str, filename: &str, absolute: &str) -> bool {
        if let Some(prefix) = &self.directory
            && (relative == prefix || relative.starts_with(&format!("{prefix}/")))
        {
            return true;
        }
        if let Some(glob) = &self.glob
            && (glob.is_match(relative) || glob.is_match(filename))
        {
            return true;
        }
        self.absolute && absolute.starts_with(&self.pattern)
    }
}

/// Ordered set of compiled ignore patterns
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    /// Compile `patterns`, trimming each and skipping empty entries.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .filter_map(|p| {
                let p = p.as_ref().trim();
                (!p.is_empty()).then(|| IgnoreRule::compile(p))
            })
            .collect();
        Self { rules }
    }

    /// Whether any pattern excludes the path.
    pub fn is_ignored(&self, relative_path: &str, filename: &str, absolute_path: &Path) -> bool {
        self.matching_pattern(relative_path, filename, absolute_path)
            .is_some()
    }

    /// First pattern that excludes the path, if any.
    pub fn matching_pattern(
        &self,
        relative_path: &str,
        filename: &str,
        absolute_path: &Path,
    ) -> Option<&str> {
        if self.rules.is_empty() {
            return None;
        }
        let relative = relative_path.replace('\\', "/");
        let absolute = absolute_path.to_string_lossy();
        self.rules
            .iter()
            .find(|rule| rule.matches(&relative, filename, &absolute))
            .map(|rule| rule.pattern.as_str())
    }
}
