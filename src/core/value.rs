//! Time-decaying revenue model.
//!
//! [`delivery_value`] is the only place revenue is computed. Scoring,
//! eviction accounting and admission pricing all go through it.

use serde::{Deserialize, Serialize};

use crate::core::{PackageInfo, QueueEntry, TimeValueFunction};

/// Global parameters shared by every time-value function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueModel {
    /// Seconds per step of a time-value function.
    pub step_interval: f64,
    /// Deliveries slower than this earn nothing.
    pub delivery_time_limit: f64,
    /// Revenue factor applied once per package tier.
    pub tier_multiplier: f64,
}

impl ValueModel {
    /// Revenue of an immediate delivery.
    pub fn max_revenue(&self, package: &PackageInfo) -> f64 {
        let tier = i32::try_from(package.tier).unwrap_or(i32::MAX);
        package.base_cost * self.tier_multiplier.powi(tier)
    }
}

/// Revenue earned if the package arrives `delivery_time` seconds after it
/// was requested.
///
/// Result is in `[0, max_revenue]` and never increases with
/// `delivery_time`.
pub fn delivery_value(
    delivery_time: f64,
    package: &PackageInfo,
    tvf: &TimeValueFunction,
    model: &ValueModel,
) -> i64 {
    if delivery_time > model.delivery_time_limit {
        return 0;
    }

    let max_revenue = model.max_revenue(package);
    let num_steps = tvf.num_steps();
    let steps_hit = steps_hit(delivery_time, tvf.steps(), num_steps, model.step_interval);

    #[allow(clippy::cast_precision_loss)]
    let penalty = (max_revenue / num_steps as f64) * steps_hit as f64;
    #[allow(clippy::cast_possible_truncation)]
    let value = (max_revenue - penalty).round_ties_even() as i64;
    value.max(0)
}

/// Penalised steps strictly before `delivery_time`, capped at `num_steps`.
///
/// Steps past the end of the flag list carry no penalty.
fn steps_hit(delivery_time: f64, steps: &[bool], num_steps: usize, interval: f64) -> usize {
    if interval <= 0.0 {
        return 0;
    }
    let mut hit = 0;
    let mut elapsed = interval;
    for &flag in steps {
        if elapsed >= delivery_time {
            break;
        }
        if flag {
            hit += 1;
            if hit == num_steps {
                break;
            }
        }
        elapsed += interval;
    }
    hit
}

/// Value of `entry` if it were delivered after exactly its travel estimate.
pub fn expected_value(entry: &QueueEntry, model: &ValueModel) -> i64 {
    let request = entry.request();
    delivery_value(
        entry.expected_duration(),
        &request.package,
        &request.time_value,
        model,
    )
}

/// Value of `entry` delivered `elapsed` seconds after it arrived.
pub(crate) fn entry_value(entry: &QueueEntry, elapsed: f64, model: &ValueModel) -> f64 {
    let request = entry.request();
    #[allow(clippy::cast_precision_loss)]
    let value = delivery_value(elapsed, &request.package, &request.time_value, model) as f64;
    value
}
