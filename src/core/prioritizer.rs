//! Global re-prioritization of a queue snapshot.
//!
//! The cost of serving one entry depends on every other entry, so scores are
//! never maintained incrementally. Each pass rescores the whole queue against
//! a single `now` and then re-sorts it.

use serde::{Deserialize, Serialize};

use crate::core::value::entry_value;
use crate::core::{QueueEntry, ValueModel};

/// How the two per-entry loss terms combine into a priority.
///
/// `lost` is what every other entry forfeits if this one is served first;
/// `won` is what this entry forfeits if it waits behind the longest
/// competing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityScoring {
    /// `won - lost`: entries that hurt their peers least are served first
    /// and evicted last.
    #[default]
    NetGain,
    /// `lost - won`.
    Displacement,
}

impl PriorityScoring {
    fn combine(self, lost: f64, won: f64) -> f64 {
        match self {
            Self::NetGain => won - lost,
            Self::Displacement => lost - won,
        }
    }
}

/// Recompute every entry's priority as of `now`.
///
/// All scores come from the same snapshot; a single entry scores 0.
pub fn score_entries(
    entries: &mut [QueueEntry],
    now: f64,
    model: &ValueModel,
    scoring: PriorityScoring,
) {
    let elapsed: Vec<f64> = entries.iter().map(|e| e.projected_elapsed(now)).collect();
    let current: Vec<f64> = entries
        .iter()
        .zip(&elapsed)
        .map(|(e, &t)| entry_value(e, t, model))
        .collect();

    let mut scores = Vec::with_capacity(entries.len());
    for (j, entry) in entries.iter().enumerate() {
        let duration = entry.expected_duration();
        let mut lost = 0.0;
        let mut max_duration: f64 = 0.0;

        for (k, other) in entries.iter().enumerate() {
            if k == j {
                continue;
            }
            lost += current[k] - entry_value(other, elapsed[k] + duration, model);
            max_duration = max_duration.max(other.expected_duration());
        }

        let won = current[j] - entry_value(entry, elapsed[j] + max_duration, model);
        scores.push(scoring.combine(lost, won));
    }

    for (entry, score) in entries.iter_mut().zip(scores) {
        entry.set_priority(score);
    }
}

/// Rescore `entries` and sort them ascending by the queue comparator.
///
/// The lowest-priority entry ends up first, the highest last.
pub fn sort_queue(
    entries: &mut [QueueEntry],
    now: f64,
    model: &ValueModel,
    scoring: PriorityScoring,
) {
    score_entries(entries, now, model, scoring);
    entries.sort_by(QueueEntry::queue_order);
    tracing::trace!(len = entries.len(), "queue rescored");
}
