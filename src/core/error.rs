//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// Scoring and eviction never fail; every variant here comes from
/// construction-time validation or from a persistence backend.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A time-value function failed validation.
    #[error("invalid time-value function: {0}")]
    InvalidTimeValue(String),
    /// Configuration values are out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Durable store failure with context.
    #[error("store error: {0}")]
    Store(String),
    /// Snapshot could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
