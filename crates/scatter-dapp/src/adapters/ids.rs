//! Identifier source adapters

use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::domain::correlation::{IdGenerator, RequestId};
use crate::ports::ids::IdSource;

/// Scripted identifier source for deterministic testing.
///
/// Hands out the queued identifiers in order, then falls back to random ones.
///
/// ```rust
/// use scatter_dapp::adapters::ScriptedIds;
/// use scatter_dapp::IdSource;
///
/// let ids = ScriptedIds::new(["first", "second"]);
/// assert_eq!(ids.next_id().as_str(), "first");
/// assert_eq!(ids.next_id().as_str(), "second");
/// assert_eq!(ids.next_id().len(), 24);
/// ```
#[derive(Debug)]
pub struct ScriptedIds {
    queue: Mutex<VecDeque<RequestId>>,
    fallback: IdGenerator,
}

impl ScriptedIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<RequestId>,
    {
        Self {
            queue: Mutex::new(ids.into_iter().map(Into::into).collect()),
            fallback: IdGenerator::default(),
        }
    }

    /// Identifiers not yet handed out
    pub fn remaining(&self) -> usize {
        self.queue.lock().len()
    }
}

impl IdSource for ScriptedIds {
    fn next_id(&self) -> RequestId {
        self.queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.generate())
    }
}
