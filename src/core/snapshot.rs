//! Flat export of a scheduler's queue and counters.

use serde::{Deserialize, Serialize};

use crate::core::{EntryId, QueueEntry, SchedulerError, SchedulerState};

/// Everything needed to rebuild a scheduler after a restart.
///
/// Entry order is not significant; restoring re-derives it from the
/// comparator on the next pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Queued entries in any order.
    pub entries: Vec<QueueEntry>,
    /// Counters at export time.
    pub state: SchedulerState,
    /// Next id to hand out.
    pub next_id: EntryId,
}

impl QueueSnapshot {
    /// Id that cannot collide with any restored entry.
    pub fn resume_id(&self) -> EntryId {
        let past_entries = self
            .entries
            .iter()
            .map(|e| e.id() + 1)
            .max()
            .unwrap_or_default();
        self.next_id.max(past_entries)
    }
}

/// Durable home for queue snapshots.
pub trait QueueStore: Send {
    /// Persist `snapshot`, replacing whatever was stored before.
    fn save(&mut self, snapshot: &QueueSnapshot) -> Result<(), SchedulerError>;
    /// Latest saved snapshot, if any.
    fn load(&mut self) -> Result<Option<QueueSnapshot>, SchedulerError>;
}
