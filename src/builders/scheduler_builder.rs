//! Builders to construct schedulers from configuration.

use std::sync::Arc;

use crate::config::{SchedulerConfig, SchedulerPolicy, StoreBackendConfig};
use crate::core::{
    DeliveryScheduler, FifoScheduler, LeastLostValueScheduler, QueueSettings, QueueStore,
    SchedulerError,
};
use crate::infra::{InMemoryStore, JsonlStore};
use crate::util::clock::Clock;

/// Build an empty scheduler of the configured policy.
pub fn build_scheduler(
    cfg: &SchedulerConfig,
    clock: Arc<dyn Clock>,
) -> Result<Box<dyn DeliveryScheduler>, SchedulerError> {
    cfg.validate()?;
    let settings = QueueSettings::from(cfg);
    let scheduler: Box<dyn DeliveryScheduler> = match cfg.policy {
        SchedulerPolicy::LeastLostValue => Box::new(LeastLostValueScheduler::new(settings, clock)?),
        SchedulerPolicy::Fifo => Box::new(FifoScheduler::new(settings, clock)?),
    };
    tracing::info!(
        policy = scheduler.policy_name(),
        capacity = cfg.capacity,
        "scheduler built"
    );
    Ok(scheduler)
}

/// Build the configured snapshot store, `None` when persistence is off.
pub fn build_store(cfg: &SchedulerConfig) -> Result<Option<Box<dyn QueueStore>>, SchedulerError> {
    let store: Option<Box<dyn QueueStore>> = match &cfg.store {
        StoreBackendConfig::None => None,
        StoreBackendConfig::InMemory => Some(Box::new(InMemoryStore::new())),
        StoreBackendConfig::File { dir, stream } => Some(Box::new(JsonlStore::new(dir, stream.clone())?)),
    };
    Ok(store)
}

/// Build a scheduler and resume it from `store`'s latest snapshot, if any.
pub fn restore_scheduler(
    cfg: &SchedulerConfig,
    clock: Arc<dyn Clock>,
    store: &mut dyn QueueStore,
) -> Result<Box<dyn DeliveryScheduler>, SchedulerError> {
    let mut scheduler = build_scheduler(cfg, clock)?;
    if let Some(snapshot) = store.load()? {
        tracing::info!(
            entries = snapshot.entries.len(),
            rejections = snapshot.state.rejections,
            "restoring scheduler from snapshot"
        );
        scheduler.restore(snapshot);
    }
    Ok(scheduler)
}
