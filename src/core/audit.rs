//! Audit sink implementations.
//!
//! Producers never hear about rejections; the audit trail is where an
//! operator can see which request was dropped and what it was worth.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::EntryId;
use crate::util::clock::now_ms;

/// Scheduler action being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Request accepted into the queue.
    Enqueue,
    /// Request turned away at admission.
    Reject,
    /// Queued request dropped by a capacity trim.
    Evict,
    /// Request handed to dispatch.
    Serve,
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Entry the event concerns, if it reached the queue.
    pub entry_id: Option<EntryId>,
    /// Scheduler that recorded the event.
    pub scheduler: String,
    /// Action taken.
    pub action: AuditAction,
    /// Revenue lost by this action, for rejections and evictions.
    pub value: Option<f64>,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that forwards events to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        tracing::info!(
            event_id = %event.event_id,
            entry = ?event.entry_id,
            scheduler = %event.scheduler,
            action = ?event.action,
            value = ?event.value,
            "audit"
        );
    }
}

/// Helper to build an audit event with a fresh id and timestamp.
pub fn build_audit_event(
    scheduler: impl Into<String>,
    action: AuditAction,
    entry_id: Option<EntryId>,
    value: Option<f64>,
) -> AuditEvent {
    AuditEvent {
        event_id: Uuid::new_v4().to_string(),
        entry_id,
        scheduler: scheduler.into(),
        action,
        value,
        created_at_ms: now_ms(),
    }
}
