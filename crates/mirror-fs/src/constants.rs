//! Naming convention for files the sync engine creates next to local files.
//!
//! A comparison artifact is a staged copy of remote content. Its name always
//! carries [`ARTIFACT_MARKER`], so change events raised by the artifact's own
//! creation can be recognised and dropped. A remote copy is what an artifact
//! becomes when the operator keeps the remote version alongside the local one.

use crate::path::split_extension;

/// Substring reserved for comparison artifact names.
pub const ARTIFACT_MARKER: &str = "_remote_temp";

/// Suffix inserted before the extension of a kept remote copy.
pub const REMOTE_COPY_SUFFIX: &str = "-remote";

/// Name of the comparison artifact staged for `filename`.
///
/// `page.html` becomes `page_remote_temp.html`.
pub fn artifact_name(filename: &str) -> String {
    let (stem, ext) = split_extension(filename);
    format!("{stem}{ARTIFACT_MARKER}{ext}")
}

/// Name under which a remote copy of `filename` is kept.
///
/// `page.html` becomes `page-remote.html`.
pub fn remote_copy_name(filename: &str) -> String {
    let (stem, ext) = split_extension(filename);
    format!("{stem}{REMOTE_COPY_SUFFIX}{ext}")
}

/// Whether `filename` belongs to a comparison artifact.
pub fn is_comparison_artifact(filename: &str) -> bool {
    filename.contains(ARTIFACT_MARKER)
}
