//! Tests for builder modules

use std::sync::Arc;

use prometheus_llv_scheduler::builders::{build_scheduler, build_store, restore_scheduler};
use prometheus_llv_scheduler::config::{SchedulerConfig, SchedulerPolicy, StoreBackendConfig};
use prometheus_llv_scheduler::core::{
    Coordinates, DeliveryRequest, DeliveryType, PackageInfo, QueueStore, TimeValueFunction,
};
use prometheus_llv_scheduler::infra::InMemoryStore;
use prometheus_llv_scheduler::util::ManualClock;

fn request() -> DeliveryRequest {
    DeliveryRequest::new(
        Coordinates::new(100.0, 0.0, 0.0),
        PackageInfo::new(30.0, 0),
        TimeValueFunction::linear(10, DeliveryType::Standard).unwrap(),
    )
}

#[test]
fn test_build_scheduler_policies() {
    let clock = Arc::new(ManualClock::new(0.0));
    let llv = build_scheduler(&SchedulerConfig::default(), clock.clone()).unwrap();
    assert_eq!(llv.policy_name(), "least_lost_value");

    let cfg = SchedulerConfig {
        policy: SchedulerPolicy::Fifo,
        ..SchedulerConfig::default()
    };
    let fifo = build_scheduler(&cfg, clock).unwrap();
    assert_eq!(fifo.policy_name(), "fifo");
}

#[test]
fn test_build_scheduler_rejects_invalid_config() {
    let cfg = SchedulerConfig {
        capacity: 0,
        ..SchedulerConfig::default()
    };
    assert!(build_scheduler(&cfg, Arc::new(ManualClock::new(0.0))).is_err());
}

#[test]
fn test_build_store_selection() {
    assert!(build_store(&SchedulerConfig::default()).unwrap().is_none());

    let cfg = SchedulerConfig {
        store: StoreBackendConfig::InMemory,
        ..SchedulerConfig::default()
    };
    assert!(build_store(&cfg).unwrap().is_some());
}

#[test]
fn test_restore_scheduler_from_store() {
    let cfg = SchedulerConfig::default();
    let clock = Arc::new(ManualClock::new(0.0));
    let mut store = InMemoryStore::new();

    let mut original = build_scheduler(&cfg, clock.clone()).unwrap();
    original.enqueue(request());
    original.enqueue(request());
    original.sync_queue(&mut store).unwrap();

    let restored = restore_scheduler(&cfg, clock, &mut store).unwrap();
    assert_eq!(restored.queue_size(), 2);
    assert_eq!(restored.state().incoming_requests, 2);
    assert!(store.load().unwrap().is_some());
}
