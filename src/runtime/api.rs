//! Producer- and metrics-facing response models.

use serde::{Deserialize, Serialize};

use crate::core::SchedulerState;

/// Reply to a producer's submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResponse {
    /// Whether the request was queued. Always true under deferred admission.
    pub accepted: bool,
}

/// Read-only view for the metrics collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Policy that produced these numbers.
    pub policy: String,
    /// Entries currently queued.
    pub queue_size: usize,
    /// Requests ever submitted.
    pub incoming_requests: u64,
    /// Cumulative value of rejected and evicted requests.
    pub potential_lost: f64,
    /// Mean value per rejection; `None` before the first rejection.
    pub avg_potential_lost: Option<f64>,
    /// Rejections so far.
    pub rejections: u64,
}

impl MetricsSnapshot {
    /// Assemble from a queue size and counters.
    pub fn new(policy: impl Into<String>, queue_size: usize, state: SchedulerState) -> Self {
        Self {
            policy: policy.into(),
            queue_size,
            incoming_requests: state.incoming_requests,
            potential_lost: state.potential_lost,
            avg_potential_lost: state.avg_potential_lost(),
            rejections: state.rejections,
        }
    }
}
