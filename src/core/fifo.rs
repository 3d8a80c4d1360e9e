//! Arrival-order scheduler.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::core::scheduler::{DeliveryScheduler, DequeueOutcome, Eviction, QueueSettings};
use crate::core::value::{entry_value, expected_value};
use crate::core::{
    DeliveryRequest, EntryId, QueueEntry, QueueSnapshot, SchedulerError, SchedulerState,
};
use crate::util::clock::Clock;

/// Serves requests in arrival order.
///
/// With deferred admission, overflow is trimmed from the newest end when the
/// next request is taken, using the same loss accounting as the
/// least-lost-value policy.
pub struct FifoScheduler {
    settings: QueueSettings,
    clock: Arc<dyn Clock>,
    entries: VecDeque<QueueEntry>,
    state: SchedulerState,
    next_id: EntryId,
}

impl FifoScheduler {
    /// Empty scheduler. Fails if `settings` do not validate.
    pub fn new(settings: QueueSettings, clock: Arc<dyn Clock>) -> Result<Self, SchedulerError> {
        settings.validate()?;
        Ok(Self {
            settings,
            clock,
            entries: VecDeque::new(),
            state: SchedulerState::default(),
            next_id: 0,
        })
    }
}

impl DeliveryScheduler for FifoScheduler {
    fn policy_name(&self) -> &'static str {
        "fifo"
    }

    fn enqueue(&mut self, request: DeliveryRequest) -> bool {
        self.state.record_incoming();
        let duration = self.settings.expected_duration(&request.destination);
        let entry = QueueEntry::new(self.next_id, self.clock.now_secs(), request, duration);
        self.next_id += 1;

        if !self.settings.admits(self.entries.len()) {
            #[allow(clippy::cast_precision_loss)]
            let value = expected_value(&entry, &self.settings.model) as f64;
            self.state.record_rejection(value);
            tracing::warn!(entry = entry.id(), value, "queue full, request rejected");
            return false;
        }

        self.entries.push_back(entry);
        true
    }

    fn dequeue(&mut self) -> DequeueOutcome {
        if self.entries.is_empty() {
            return DequeueOutcome::default();
        }

        let now = self.clock.now_secs();
        let mut evicted = Vec::new();
        while self.entries.len() > self.settings.capacity {
            let Some(entry) = self.entries.pop_back() else {
                break;
            };
            let value = entry_value(&entry, entry.projected_elapsed(now), &self.settings.model);
            self.state.record_rejection(value);
            tracing::info!(entry = entry.id(), value, "evicted delivery request");
            evicted.push(Eviction { entry, value });
        }
        // trimmed from the back, report oldest first
        evicted.reverse();

        DequeueOutcome {
            served: self.entries.pop_front(),
            evicted,
        }
    }

    fn queue_size(&self) -> usize {
        self.entries.len()
    }

    fn state(&self) -> SchedulerState {
        self.state
    }

    fn next_id(&self) -> EntryId {
        self.next_id
    }

    fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            entries: self.entries.iter().cloned().collect(),
            state: self.state,
            next_id: self.next_id,
        }
    }

    fn restore(&mut self, snapshot: QueueSnapshot) {
        self.next_id = snapshot.resume_id();
        self.state = snapshot.state;
        let mut entries = snapshot.entries;
        entries.sort_by(|a, b| {
            a.timestamp()
                .total_cmp(&b.timestamp())
                .then_with(|| a.id().cmp(&b.id()))
        });
        self.entries = entries.into();
    }
}
