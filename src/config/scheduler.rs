//! Scheduler configuration structures.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{
    AdmissionPolicy, AppResult, Coordinates, DeliveryType, EvictionRescoring, PriorityScoring,
    QueueSettings, SchedulerError, TimeValueFunction, ValueModel,
};

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "LLV_";

/// Which scheduling policy to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerPolicy {
    /// Score-ordered service with least-lost-value eviction.
    #[default]
    LeastLostValue,
    /// Arrival-order service.
    Fifo,
}

impl FromStr for SchedulerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "least_lost_value" => Ok(Self::LeastLostValue),
            "fifo" => Ok(Self::Fifo),
            other => Err(format!("unknown scheduler policy `{other}`")),
        }
    }
}

/// Snapshot store selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StoreBackendConfig {
    /// Nothing is persisted.
    #[default]
    None,
    /// Process-local store for development/testing.
    InMemory,
    /// JSON-lines file under `dir`, named after `stream`.
    File {
        /// Directory holding the snapshot file.
        dir: PathBuf,
        /// Snapshot file stem.
        stream: String,
    },
}

/// Root scheduler configuration. Immutable once a scheduler is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Queue size enforced at each dequeue.
    pub capacity: usize,
    /// Service speed in metres per second, used for travel estimates.
    pub max_speed: f64,
    /// Seconds per time-value step.
    pub step_interval: f64,
    /// Flag count of the preset time-value functions.
    pub tvf_steps: usize,
    /// Deliveries slower than this many seconds earn nothing.
    pub delivery_time_limit: f64,
    /// Revenue factor applied per package tier.
    pub tier_multiplier: f64,
    /// Where deliveries depart from.
    pub origin: Coordinates,
    /// Scheduling policy.
    pub policy: SchedulerPolicy,
    /// Whether enqueue may reject.
    pub admission: AdmissionPolicy,
    /// When eviction passes rescore.
    pub eviction_rescoring: EvictionRescoring,
    /// Priority sign convention.
    pub scoring: PriorityScoring,
    /// Seconds between dispatch ticks.
    pub dispatch_interval_secs: f64,
    /// Seconds between metrics reports.
    pub metrics_interval_secs: f64,
    /// Snapshot store.
    pub store: StoreBackendConfig,
    /// Mirror scheduler actions to the log as audit events.
    pub audit_log: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            capacity: 30,
            max_speed: 20.0,
            step_interval: 60.0,
            tvf_steps: 10,
            delivery_time_limit: 1800.0,
            tier_multiplier: 1.5,
            origin: Coordinates::default(),
            policy: SchedulerPolicy::default(),
            admission: AdmissionPolicy::default(),
            eviction_rescoring: EvictionRescoring::default(),
            scoring: PriorityScoring::default(),
            dispatch_interval_secs: 0.75,
            metrics_interval_secs: 60.0,
            store: StoreBackendConfig::default(),
            audit_log: false,
        }
    }
}

fn positive(name: &str, value: f64) -> Result<(), SchedulerError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SchedulerError::InvalidConfig(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.capacity == 0 {
            return Err(SchedulerError::InvalidConfig(
                "capacity must be greater than 0".into(),
            ));
        }
        if self.tvf_steps == 0 {
            return Err(SchedulerError::InvalidConfig(
                "tvf_steps must be greater than 0".into(),
            ));
        }
        positive("max_speed", self.max_speed)?;
        positive("step_interval", self.step_interval)?;
        positive("delivery_time_limit", self.delivery_time_limit)?;
        positive("tier_multiplier", self.tier_multiplier)?;
        positive("dispatch_interval_secs", self.dispatch_interval_secs)?;
        positive("metrics_interval_secs", self.metrics_interval_secs)?;
        if let StoreBackendConfig::File { stream, .. } = &self.store {
            if stream.is_empty() {
                return Err(SchedulerError::InvalidConfig(
                    "file store stream must not be empty".into(),
                ));
            }
        }
        Ok(())
    }

    /// Value-model parameters.
    pub const fn value_model(&self) -> ValueModel {
        ValueModel {
            step_interval: self.step_interval,
            delivery_time_limit: self.delivery_time_limit,
            tier_multiplier: self.tier_multiplier,
        }
    }

    /// Linear preset sized to `tvf_steps`.
    pub fn linear_time_value(
        &self,
        delivery_type: DeliveryType,
    ) -> Result<TimeValueFunction, SchedulerError> {
        TimeValueFunction::linear(self.tvf_steps, delivery_type)
    }

    /// Two-stage preset sized to `tvf_steps`.
    pub fn two_stage_time_value(
        &self,
        delivery_type: DeliveryType,
    ) -> Result<TimeValueFunction, SchedulerError> {
        TimeValueFunction::two_stage(self.tvf_steps, delivery_type)
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, SchedulerError> {
        let cfg: Self = serde_json::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = Self::from_json_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }

    /// Defaults overridden by `LLV_*` environment variables, after loading a
    /// `.env` file if one is present.
    pub fn from_env() -> Result<Self, SchedulerError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("ignoring unreadable .env file: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`, keyed `LLV_<FIELD>`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SchedulerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |field: &str| lookup(&format!("{ENV_PREFIX}{field}"));

        override_parsed(&mut cfg.capacity, "CAPACITY", get("CAPACITY"))?;
        override_parsed(&mut cfg.max_speed, "MAX_SPEED", get("MAX_SPEED"))?;
        override_parsed(&mut cfg.step_interval, "STEP_INTERVAL", get("STEP_INTERVAL"))?;
        override_parsed(&mut cfg.tvf_steps, "TVF_STEPS", get("TVF_STEPS"))?;
        override_parsed(
            &mut cfg.delivery_time_limit,
            "DELIVERY_TIME_LIMIT",
            get("DELIVERY_TIME_LIMIT"),
        )?;
        override_parsed(&mut cfg.tier_multiplier, "TIER_MULTIPLIER", get("TIER_MULTIPLIER"))?;
        override_parsed(&mut cfg.policy, "POLICY", get("POLICY"))?;
        override_parsed(&mut cfg.audit_log, "AUDIT_LOG", get("AUDIT_LOG"))?;
        override_parsed(
            &mut cfg.dispatch_interval_secs,
            "DISPATCH_INTERVAL_SECS",
            get("DISPATCH_INTERVAL_SECS"),
        )?;
        override_parsed(
            &mut cfg.metrics_interval_secs,
            "METRICS_INTERVAL_SECS",
            get("METRICS_INTERVAL_SECS"),
        )?;
        if let Some(dir) = get("STORE_DIR") {
            cfg.store = StoreBackendConfig::File {
                dir: PathBuf::from(dir),
                stream: get("STORE_STREAM").unwrap_or_else(|| "scheduler".into()),
            };
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn override_parsed<T>(
    slot: &mut T,
    field: &str,
    raw: Option<String>,
) -> Result<(), SchedulerError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = raw {
        *slot = raw.trim().parse().map_err(|e| {
            SchedulerError::InvalidConfig(format!("{ENV_PREFIX}{field}=`{raw}`: {e}"))
        })?;
    }
    Ok(())
}

impl From<&SchedulerConfig> for QueueSettings {
    fn from(cfg: &SchedulerConfig) -> Self {
        Self {
            capacity: cfg.capacity,
            max_speed: cfg.max_speed,
            origin: cfg.origin,
            model: cfg.value_model(),
            admission: cfg.admission,
            eviction_rescoring: cfg.eviction_rescoring,
            scoring: cfg.scoring,
        }
    }
}
