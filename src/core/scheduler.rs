//! Scheduling interface and the least-lost-value admission controller.
//!
//! Producers enqueue without blocking; capacity is enforced lazily when the
//! dispatch side asks for the next request. At that point the queue is
//! rescored, the lowest-priority entries are evicted until the queue fits,
//! and the highest-priority entry is served.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::prioritizer::sort_queue;
use crate::core::value::{entry_value, expected_value};
use crate::core::{
    Coordinates, DeliveryRequest, EntryId, PriorityScoring, QueueEntry, QueueSnapshot,
    QueueStore, SchedulerError, SchedulerState, ValueModel,
};
use crate::util::clock::Clock;

/// Whether enqueue may turn requests away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionPolicy {
    /// Always accept; overflow is resolved at the next dequeue.
    #[default]
    Deferred,
    /// Reject once the queue holds `capacity` entries.
    Bounded,
}

/// When an eviction pass recomputes scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionRescoring {
    /// Every eviction in a pass uses the scores computed before the pass.
    #[default]
    SinglePass,
    /// Rescore the remaining queue after each eviction.
    PerEviction,
}

/// Fixed parameters of one scheduler instance.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueSettings {
    /// Maximum queue size at dequeue time.
    pub capacity: usize,
    /// Service speed used for travel estimates.
    pub max_speed: f64,
    /// Departure point for travel estimates.
    pub origin: Coordinates,
    /// Revenue model.
    pub model: ValueModel,
    /// Admission behavior.
    pub admission: AdmissionPolicy,
    /// Eviction rescoring behavior.
    pub eviction_rescoring: EvictionRescoring,
    /// Priority sign convention.
    pub scoring: PriorityScoring,
}

impl QueueSettings {
    /// Reject settings no scheduler can run with.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.capacity == 0 {
            return Err(SchedulerError::InvalidConfig(
                "capacity must be greater than 0".into(),
            ));
        }
        let positive = [
            ("max_speed", self.max_speed),
            ("step_interval", self.model.step_interval),
            ("delivery_time_limit", self.model.delivery_time_limit),
            ("tier_multiplier", self.model.tier_multiplier),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SchedulerError::InvalidConfig(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Travel-time estimate from the origin to `destination`.
    pub fn expected_duration(&self, destination: &Coordinates) -> f64 {
        self.origin.distance_to(destination) / self.max_speed
    }

    pub(crate) fn admits(&self, queued: usize) -> bool {
        match self.admission {
            AdmissionPolicy::Deferred => true,
            AdmissionPolicy::Bounded => queued < self.capacity,
        }
    }
}

/// A request dropped to bring the queue back within capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Eviction {
    /// Dropped entry, with the score that condemned it.
    pub entry: QueueEntry,
    /// Value it would have earned, added to lost potential.
    pub value: f64,
}

/// Result of one dequeue call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DequeueOutcome {
    /// Entry handed to dispatch, `None` on an empty queue.
    pub served: Option<QueueEntry>,
    /// Entries evicted by this call's trim pass.
    pub evicted: Vec<Eviction>,
}

/// Scheduling capability shared by every policy.
///
/// Implementations assume a single serialized caller.
pub trait DeliveryScheduler: Send {
    /// Short policy name for logs.
    fn policy_name(&self) -> &'static str;

    /// Submit a request. Returns whether it was queued.
    fn enqueue(&mut self, request: DeliveryRequest) -> bool;

    /// Enforce capacity and pop the next entry to serve.
    fn dequeue(&mut self) -> DequeueOutcome;

    /// Next entry to serve, `None` when the queue is empty.
    fn get_next_request(&mut self) -> Option<QueueEntry> {
        self.dequeue().served
    }

    /// Entries currently queued.
    fn queue_size(&self) -> usize;

    /// Counters.
    fn state(&self) -> SchedulerState;

    /// Cumulative value of rejected and evicted requests.
    fn potential_lost(&self) -> f64 {
        self.state().potential_lost
    }

    /// Mean lost value per rejection, `None` before any rejection.
    fn avg_potential_lost(&self) -> Option<f64> {
        self.state().avg_potential_lost()
    }

    /// Rejections so far.
    fn rejections(&self) -> u64 {
        self.state().rejections
    }

    /// Id the next enqueued request will receive.
    fn next_id(&self) -> EntryId;

    /// Export queue and counters.
    fn snapshot(&self) -> QueueSnapshot;

    /// Replace queue and counters with `snapshot`.
    fn restore(&mut self, snapshot: QueueSnapshot);

    /// Write the current snapshot to `store`.
    fn sync_queue(&self, store: &mut dyn QueueStore) -> Result<(), SchedulerError> {
        store.save(&self.snapshot())
    }
}

/// Scheduler that serves the entry whose service costs the system least and
/// evicts the entries whose loss matters least.
pub struct LeastLostValueScheduler {
    settings: QueueSettings,
    clock: Arc<dyn Clock>,
    entries: Vec<QueueEntry>,
    state: SchedulerState,
    next_id: EntryId,
}

impl LeastLostValueScheduler {
    /// Empty scheduler. Fails if `settings` do not validate.
    pub fn new(settings: QueueSettings, clock: Arc<dyn Clock>) -> Result<Self, SchedulerError> {
        settings.validate()?;
        Ok(Self {
            settings,
            clock,
            entries: Vec::new(),
            state: SchedulerState::default(),
            next_id: 0,
        })
    }

    /// Scheduler resumed from a stored snapshot.
    pub fn from_snapshot(
        settings: QueueSettings,
        clock: Arc<dyn Clock>,
        snapshot: QueueSnapshot,
    ) -> Result<Self, SchedulerError> {
        let mut scheduler = Self::new(settings, clock)?;
        scheduler.restore(snapshot);
        Ok(scheduler)
    }

    /// Instance parameters.
    pub const fn settings(&self) -> &QueueSettings {
        &self.settings
    }

    /// Queued entries. Entries present at the last pass come first, lowest
    /// priority first; entries enqueued since then follow in arrival order
    /// with their priority still 0.
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Rescore and reorder the queue as of now.
    pub fn sort_queue(&mut self) {
        let now = self.clock.now_secs();
        self.rescore(now);
    }

    fn rescore(&mut self, now: f64) {
        sort_queue(
            &mut self.entries,
            now,
            &self.settings.model,
            self.settings.scoring,
        );
    }

    /// Drop lowest-priority entries until the queue fits. Scores must be
    /// current as of `now`.
    fn trim(&mut self, now: f64) -> Vec<Eviction> {
        let mut evicted = Vec::new();
        while self.entries.len() > self.settings.capacity {
            let entry = self.entries.remove(0);
            let value = entry_value(&entry, entry.projected_elapsed(now), &self.settings.model);
            self.state.record_rejection(value);
            tracing::info!(
                entry = entry.id(),
                priority = entry.priority(),
                value,
                "evicted delivery request"
            );
            evicted.push(Eviction { entry, value });

            if self.settings.eviction_rescoring == EvictionRescoring::PerEviction {
                self.rescore(now);
            }
        }
        evicted
    }
}

impl DeliveryScheduler for LeastLostValueScheduler {
    fn policy_name(&self) -> &'static str {
        "least_lost_value"
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

        tracing::debug!(
            entry = entry.id(),
            expected_duration = duration,
            "delivery request enqueued"
        );
        self.entries.push(entry);
        true
    }

    fn dequeue(&mut self) -> DequeueOutcome {
        if self.entries.is_empty() {
            return DequeueOutcome::default();
        }

        let now = self.clock.now_secs();
        self.rescore(now);
        let evicted = self.trim(now);
        let served = self.entries.pop();
        if let Some(entry) = &served {
            tracing::debug!(
                entry = entry.id(),
                priority = entry.priority(),
                remaining = self.entries.len(),
                "serving delivery request"
            );
        }
        DequeueOutcome { served, evicted }
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
            entries: self.entries.clone(),
            state: self.state,
            next_id: self.next_id,
        }
    }

    fn restore(&mut self, snapshot: QueueSnapshot) {
        self.next_id = snapshot.resume_id();
        self.state = snapshot.state;
        self.entries = snapshot.entries;
        self.entries.sort_by(QueueEntry::queue_order);
    }
}
