//! Identifier source port.

use crate::domain::correlation::{IdGenerator, RequestId};

/// Source of fresh request identifiers.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> RequestId;
}

impl IdSource for IdGenerator {
    fn next_id(&self) -> RequestId {
        self.generate()
    }
}
