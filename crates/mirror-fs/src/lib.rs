//! Filesystem layer for Remote Mirror
//!
//! Provides forward-slash path handling, the naming convention for
//! comparison artifacts, and the small set of local file operations the
//! sync engine relies on (byte comparison, atomic replace, config loading).

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::{ARTIFACT_MARKER, REMOTE_COPY_SUFFIX, artifact_name, is_comparison_artifact, remote_copy_name};
pub use error::{Error, Result};
pub use path::{NormalizedPath, split_extension};
