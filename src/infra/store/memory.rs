//! In-memory snapshot store.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{QueueSnapshot, QueueStore, SchedulerError};

/// Keeps the latest snapshot in memory. Clones share the same slot, so a
/// test can hold one handle while a service owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    latest: Arc<Mutex<Option<QueueSnapshot>>>,
    saves: Arc<Mutex<usize>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest snapshot without going through the trait.
    pub fn latest(&self) -> Option<QueueSnapshot> {
        self.latest.lock().clone()
    }

    /// Number of saves so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl QueueStore for InMemoryStore {
    fn save(&mut self, snapshot: &QueueSnapshot) -> Result<(), SchedulerError> {
        *self.latest.lock() = Some(snapshot.clone());
        *self.saves.lock() += 1;
        Ok(())
    }

    fn load(&mut self) -> Result<Option<QueueSnapshot>, SchedulerError> {
        Ok(self.latest())
    }
}
