//! Shared test utilities for the Remote Mirror workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`transport`]: [`FakeTransport`], an in-memory remote with a call log
//! - [`decider`]: [`ScriptedDecider`], a queue of conflict decisions
//! - [`tree`]: [`TestTree`], a temporary local root with file helpers

pub mod decider;
pub mod transport;
pub mod tree;

pub use decider::ScriptedDecider;
pub use transport::{FakeTransport, TransportCall};
pub use tree::TestTree;
