//! Shared, serialized access to one scheduler instance.
//!
//! The schedulers are single-writer. `SchedulerService` puts the scheduler,
//! its store and its audit sink behind one `parking_lot::Mutex`, so enqueue,
//! rescoring, eviction and dequeue never interleave no matter how many
//! producers and dispatchers hold a clone.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::builders::{build_store, restore_scheduler};
use crate::config::SchedulerConfig;
use crate::core::{
    build_audit_event, AuditAction, AuditSink, DeliveryRequest, DeliveryScheduler, QueueEntry,
    QueueStore, SchedulerError, TracingAuditSink,
};
use crate::runtime::api::{DeliveryResponse, MetricsSnapshot};
use crate::util::clock::Clock;

struct ServiceInner {
    scheduler: Box<dyn DeliveryScheduler>,
    store: Option<Box<dyn QueueStore>>,
    audit: Option<Box<dyn AuditSink>>,
}

impl ServiceInner {
    fn record(&mut self, action: AuditAction, entry_id: Option<u64>, value: Option<f64>) {
        if let Some(sink) = self.audit.as_mut() {
            sink.record(build_audit_event(
                self.scheduler.policy_name(),
                action,
                entry_id,
                value,
            ));
        }
    }

    /// Persist after a mutation. A failed write is logged; the in-memory
    /// queue stays authoritative and the next mutation retries.
    fn sync(&mut self) {
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = self.scheduler.sync_queue(store.as_mut()) {
                tracing::error!("failed to sync scheduler queue: {e}");
            }
        }
    }
}

/// Cloneable handle serializing every call into one scheduler.
#[derive(Clone)]
pub struct SchedulerService {
    inner: Arc<Mutex<ServiceInner>>,
}

impl SchedulerService {
    /// Wrap a scheduler with no store and no audit sink.
    pub fn new(scheduler: Box<dyn DeliveryScheduler>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ServiceInner {
                scheduler,
                store: None,
                audit: None,
            })),
        }
    }

    /// Build the configured scheduler and store, resuming from the store's
    /// latest snapshot.
    pub fn from_config(cfg: &SchedulerConfig, clock: Arc<dyn Clock>) -> Result<Self, SchedulerError> {
        let mut store = build_store(cfg)?;
        let scheduler = match store.as_mut() {
            Some(store) => restore_scheduler(cfg, clock, store.as_mut())?,
            None => crate::builders::build_scheduler(cfg, clock)?,
        };
        let mut service = Self::new(scheduler);
        if let Some(store) = store {
            service = service.with_store(store);
        }
        if cfg.audit_log {
            service = service.with_audit(Box::new(TracingAuditSink));
        }
        Ok(service)
    }

    /// Attach a store synced after every mutation.
    pub fn with_store(self, store: Box<dyn QueueStore>) -> Self {
        self.inner.lock().store = Some(store);
        self
    }

    /// Attach an audit sink.
    pub fn with_audit(self, audit: Box<dyn AuditSink>) -> Self {
        self.inner.lock().audit = Some(audit);
        self
    }

    /// Submit a request on behalf of a producer.
    pub fn enqueue(&self, request: DeliveryRequest) -> DeliveryResponse {
        let mut inner = self.inner.lock();
        let before = inner.scheduler.state();
        let accepted = inner.scheduler.enqueue(request);
        if accepted {
            if inner.audit.is_some() {
                let id = inner.scheduler.next_id().checked_sub(1);
                inner.record(AuditAction::Enqueue, id, None);
            }
        } else {
            let lost = inner.scheduler.state().potential_lost - before.potential_lost;
            inner.record(AuditAction::Reject, None, Some(lost));
        }
        inner.sync();
        DeliveryResponse { accepted }
    }

    /// Take the next request for dispatch, evicting overflow first.
    ///
    /// Evictions are audited and persisted even when nothing is served.
    pub fn next_request(&self) -> Option<QueueEntry> {
        let mut inner = self.inner.lock();
        let outcome = inner.scheduler.dequeue();
        if outcome.served.is_none() && outcome.evicted.is_empty() {
            return None;
        }

        for eviction in &outcome.evicted {
            inner.record(
                AuditAction::Evict,
                Some(eviction.entry.id()),
                Some(eviction.value),
            );
        }
        if let Some(served) = &outcome.served {
            inner.record(AuditAction::Serve, Some(served.id()), None);
        }
        inner.sync();
        outcome.served
    }

    /// Current queue size and counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        let inner = self.inner.lock();
        MetricsSnapshot::new(
            inner.scheduler.policy_name(),
            inner.scheduler.queue_size(),
            inner.scheduler.state(),
        )
    }

    /// Force a write to the attached store.
    pub fn sync(&self) -> Result<(), SchedulerError> {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;
        match inner.store.as_mut() {
            Some(store) => inner.scheduler.sync_queue(store.as_mut()),
            None => Ok(()),
        }
    }
}
