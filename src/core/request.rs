//! Delivery requests, time-value functions, and queue entries.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;

/// Sequence number assigned to an entry at enqueue time.
pub type EntryId = u64;

/// Point in world space, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    /// East-west axis.
    pub x: f64,
    /// Vertical axis.
    pub y: f64,
    /// North-south axis.
    pub z: f64,
}

impl Coordinates {
    /// Build a coordinate triple.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dz.mul_add(dz, dx.mul_add(dx, dy * dy)).sqrt()
    }
}

/// Package metadata priced by the value model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Revenue for an on-time delivery at tier 0.
    pub base_cost: f64,
    /// Service tier; revenue scales by `tier_multiplier^tier`.
    pub tier: u32,
}

impl PackageInfo {
    /// Package priced at `base_cost` in the given tier.
    pub const fn new(base_cost: f64, tier: u32) -> Self {
        Self { base_cost, tier }
    }
}

/// Delivery-type tag carried by a time-value function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    /// Regular service.
    #[default]
    Standard,
    /// Expedited service.
    Express,
}

#[derive(Deserialize)]
struct TimeValueFunctionRepr {
    steps: Vec<bool>,
    num_steps: usize,
    #[serde(default)]
    delivery_type: DeliveryType,
}

/// Staged revenue-decay schedule.
///
/// Each flag in `steps` marks whether the corresponding elapsed step interval
/// costs a penalty. Decay saturates after `num_steps` penalties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimeValueFunctionRepr")]
pub struct TimeValueFunction {
    steps: Vec<bool>,
    num_steps: usize,
    delivery_type: DeliveryType,
}

impl TryFrom<TimeValueFunctionRepr> for TimeValueFunction {
    type Error = SchedulerError;

    fn try_from(repr: TimeValueFunctionRepr) -> Result<Self, Self::Error> {
        Self::new(repr.steps, repr.num_steps, repr.delivery_type)
    }
}

impl TimeValueFunction {
    /// Validate and build a schedule.
    ///
    /// `num_steps` must be at least 1 and no larger than the flag list.
    pub fn new(
        steps: Vec<bool>,
        num_steps: usize,
        delivery_type: DeliveryType,
    ) -> Result<Self, SchedulerError> {
        if num_steps == 0 {
            return Err(SchedulerError::InvalidTimeValue(
                "num_steps must be greater than 0".into(),
            ));
        }
        if num_steps > steps.len() {
            return Err(SchedulerError::InvalidTimeValue(format!(
                "num_steps {num_steps} exceeds step sequence length {}",
                steps.len()
            )));
        }
        Ok(Self {
            steps,
            num_steps,
            delivery_type,
        })
    }

    /// Every interval is penalised; the value reaches zero after
    /// `step_count` intervals.
    pub fn linear(step_count: usize, delivery_type: DeliveryType) -> Result<Self, SchedulerError> {
        Self::new(vec![true; step_count], step_count, delivery_type)
    }

    /// Two penalties, at the fifth and tenth intervals.
    pub fn two_stage(
        step_count: usize,
        delivery_type: DeliveryType,
    ) -> Result<Self, SchedulerError> {
        let steps = (0..step_count).map(|i| i == 4 || i == 9).collect();
        Self::new(steps, 2, delivery_type)
    }

    /// Penalty flags, one per step interval.
    pub fn steps(&self) -> &[bool] {
        &self.steps
    }

    /// Saturation count.
    pub const fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Delivery-type tag.
    pub const fn delivery_type(&self) -> DeliveryType {
        self.delivery_type
    }
}

/// A pending request to carry a package to a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRequest {
    /// Drop-off point.
    pub destination: Coordinates,
    /// Priced payload.
    pub package: PackageInfo,
    /// Revenue-decay schedule.
    pub time_value: TimeValueFunction,
}

impl DeliveryRequest {
    /// Bundle a request.
    pub const fn new(
        destination: Coordinates,
        package: PackageInfo,
        time_value: TimeValueFunction,
    ) -> Self {
        Self {
            destination,
            package,
            time_value,
        }
    }
}

/// A request waiting in a scheduler queue.
///
/// `priority` is only meaningful for the scoring pass that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    id: EntryId,
    timestamp: f64,
    request: DeliveryRequest,
    priority: f64,
    expected_duration: f64,
}

impl QueueEntry {
    /// Wrap `request`, arriving at `timestamp` with a fixed travel estimate.
    pub const fn new(
        id: EntryId,
        timestamp: f64,
        request: DeliveryRequest,
        expected_duration: f64,
    ) -> Self {
        Self {
            id,
            timestamp,
            request,
            priority: 0.0,
            expected_duration,
        }
    }

    /// Enqueue sequence number.
    pub const fn id(&self) -> EntryId {
        self.id
    }

    /// Arrival time in seconds.
    pub const fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Wrapped request.
    pub const fn request(&self) -> &DeliveryRequest {
        &self.request
    }

    /// Score from the latest pass.
    pub const fn priority(&self) -> f64 {
        self.priority
    }

    /// Travel-time estimate fixed at enqueue.
    pub const fn expected_duration(&self) -> f64 {
        self.expected_duration
    }

    /// Waited time plus remaining travel time, as seen at `now`.
    pub fn projected_elapsed(&self, now: f64) -> f64 {
        now - self.timestamp + self.expected_duration
    }

    pub(crate) fn set_priority(&mut self, priority: f64) {
        self.priority = priority;
    }

    /// Comparator: priority ascending, then arrival time, then id.
    pub fn queue_order(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| self.timestamp.total_cmp(&other.timestamp))
            .then_with(|| self.id.cmp(&other.id))
    }
}
