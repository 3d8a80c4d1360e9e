//! Configuration models for the scheduler, its policies, and persistence.

pub mod scheduler;

pub use scheduler::{SchedulerConfig, SchedulerPolicy, StoreBackendConfig, ENV_PREFIX};
