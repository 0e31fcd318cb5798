//! Sync decision engine for Remote Mirror
//!
//! This crate decides what happens to each changed local file:
//!
//! - **Ignore rules**: directory prefixes, globs and absolute paths
//! - **Remote probe**: existence checks and staging of remote content
//! - **Diffs**: unified text diffs shown before a conflict decision
//! - **Conflict resolution**: a small state machine fed by a pluggable
//!   [`DecisionProvider`]
//! - **Uploads**: direct transfer with one directory-creating retry
//! - **SyncEngine**: the per-event flow tying the above together
//!
//! # Architecture
//!
//! ```text
//!                 mirror-cli
//!                     |
//!                mirror-core
//!                     |
//!          +----------+-----------+
//!          |                      |
//!      mirror-fs          mirror-transport
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mirror_core::{ChangeEvent, SyncConfig, SyncEngine, SyncMode, SyncSession};
//! use mirror_transport::LftpTransport;
//!
//! async fn example(decider: Arc<dyn mirror_core::DecisionProvider>) -> mirror_core::Result<()> {
//!     let config = SyncConfig::load("sync_config.json".as_ref())?;
//!     let transport = Arc::new(LftpTransport::new(config.endpoint(), config.transfer_settings()));
//!     let engine = SyncEngine::new(
//!         SyncSession::from_config(&config),
//!         SyncMode::CheckConflicts,
//!         transport,
//!         decider,
//!     );
//!     let outcome = engine.handle(ChangeEvent::file("/home/me/site/index.html")).await;
//!     println!("{outcome}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod conflict;
pub mod diff;
pub mod engine;
pub mod error;
pub mod ignore;
pub mod mapping;
pub mod probe;
pub mod session;
pub mod upload;

pub use config::{DEFAULT_CONFIG_FILE, SyncConfig};
pub use conflict::{ConflictDecision, ConflictResolver, DecisionProvider, ResolveState};
pub use diff::{DiffView, show_diff};
pub use engine::{SyncEngine, SyncMode, SyncOutcome};
pub use error::{Error, Result};
pub use ignore::IgnoreMatcher;
pub use mapping::{ChangeEvent, SyncTarget};
pub use probe::{ComparisonArtifact, RemoteProbe};
pub use session::{SessionOverrides, SyncSession};
pub use upload::{UploadExecutor, UploadReport};
