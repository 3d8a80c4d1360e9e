//! Running counters owned by a scheduler instance.

use serde::{Deserialize, Serialize};

/// Incoming, rejection and lost-potential tallies.
///
/// Each scheduler owns exactly one of these and lends it mutably to the
/// routine running a pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SchedulerState {
    /// Requests ever submitted, accepted or not.
    pub incoming_requests: u64,
    /// Summed value of every rejected or evicted request.
    pub potential_lost: f64,
    /// Requests rejected at admission or evicted at dequeue.
    pub rejections: u64,
}

impl SchedulerState {
    /// Count a submission.
    pub fn record_incoming(&mut self) {
        self.incoming_requests += 1;
    }

    /// Count a rejection worth `value`.
    pub fn record_rejection(&mut self, value: f64) {
        self.potential_lost += value;
        self.rejections += 1;
    }

    /// Mean value lost per rejection, `None` before the first rejection.
    pub fn avg_potential_lost(&self) -> Option<f64> {
        if self.rejections == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let rejections = self.rejections as f64;
        Some(self.potential_lost / rejections)
    }
}
