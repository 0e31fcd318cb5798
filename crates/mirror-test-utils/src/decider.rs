//! [`ScriptedDecider`]: conflict decisions from a queue.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use mirror_core::{ConflictDecision, DecisionProvider, DiffView, Error, Result};

/// Answers conflicts from a fixed queue and records what it was shown.
///
/// Running out of queued decisions is reported as an error, so a test that
/// triggers an unexpected conflict fails loudly.
#[derive(Debug, Default)]
pub struct ScriptedDecider {
    queue: Mutex<VecDeque<ConflictDecision>>,
    presented: Mutex<Vec<(String, Option<DiffView>)>>,
}

impl ScriptedDecider {
    pub fn new(decisions: impl IntoIterator<Item = ConflictDecision>) -> Self {
        Self {
            queue: Mutex::new(decisions.into_iter().collect()),
            presented: Mutex::default(),
        }
    }

    /// A decider that fails if it is ever asked.
    pub fn never() -> Self {
        Self::default()
    }

    /// `(filename, diff)` for every conflict presented so far.
    pub fn presented(&self) -> Vec<(String, Option<DiffView>)> {
        self.presented.lock().unwrap().clone()
    }

    pub fn prompt_count(&self) -> usize {
        self.presented.lock().unwrap().len()
    }
}

#[async_trait]
impl DecisionProvider for ScriptedDecider {
    async fn decide(&self, filename: &str, diff: Option<&DiffView>) -> Result<ConflictDecision> {
        self.presented
            .lock()
            .unwrap()
            .push((filename.to_string(), diff.cloned()));
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::decision(format!("no scripted decision for {}", filename)))
    }
}
