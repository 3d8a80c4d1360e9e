//! Tests for snapshot stores

use std::path::PathBuf;

use prometheus_llv_scheduler::core::{
    Coordinates, DeliveryRequest, DeliveryType, PackageInfo, QueueEntry, QueueSnapshot,
    QueueStore, SchedulerState, TimeValueFunction,
};
use prometheus_llv_scheduler::infra::{InMemoryStore, JsonlStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("llv-store-{}", uuid::Uuid::new_v4()))
}

fn snapshot() -> QueueSnapshot {
    let tvf = TimeValueFunction::two_stage(10, DeliveryType::Express).unwrap();
    let request = DeliveryRequest::new(
        Coordinates::new(120.0, 0.0, -40.0),
        PackageInfo::new(75.0, 1),
        tvf,
    );
    QueueSnapshot {
        entries: vec![
            QueueEntry::new(3, 10.0, request.clone(), 6.5),
            QueueEntry::new(4, 12.0, request, 8.0),
        ],
        state: SchedulerState {
            incoming_requests: 5,
            potential_lost: 140.0,
            rejections: 2,
        },
        next_id: 5,
    }
}

#[test]
fn test_in_memory_store_shares_state() {
    let store = InMemoryStore::new();
    let mut handle = store.clone();
    assert!(handle.load().unwrap().is_none());

    handle.save(&snapshot()).unwrap();
    assert_eq!(store.latest(), Some(snapshot()));
    assert_eq!(store.save_count(), 1);
}

#[test]
fn test_jsonl_store_round_trip() {
    let dir = temp_dir();
    let mut store = JsonlStore::new(&dir, "controller").unwrap();
    assert!(store.load().unwrap().is_none());

    store.save(&snapshot()).unwrap();
    assert!(store.file_path().exists());

    let mut reopened = JsonlStore::new(&dir, "controller").unwrap();
    assert_eq!(reopened.load().unwrap(), Some(snapshot()));

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_jsonl_store_overwrites() {
    let dir = temp_dir();
    let mut store = JsonlStore::new(&dir, "controller").unwrap();
    store.save(&snapshot()).unwrap();

    let empty = QueueSnapshot::default();
    store.save(&empty).unwrap();
    assert_eq!(store.load().unwrap(), Some(empty));

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_jsonl_store_detects_truncation() {
    let dir = temp_dir();
    let mut store = JsonlStore::new(&dir, "controller").unwrap();
    store.save(&snapshot()).unwrap();

    let path = store.file_path();
    let contents = std::fs::read_to_string(&path).unwrap();
    let truncated: Vec<&str> = contents.lines().take(2).collect();
    std::fs::write(&path, truncated.join("\n")).unwrap();

    assert!(store.load().is_err());
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_jsonl_store_rejects_invalid_time_value() {
    let dir = temp_dir();
    let mut store = JsonlStore::new(&dir, "controller").unwrap();
    store.save(&snapshot()).unwrap();

    let path = store.file_path();
    let contents = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, contents.replace("\"num_steps\":2", "\"num_steps\":20")).unwrap();

    assert!(store.load().is_err());
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_resume_id_skips_restored_entries() {
    let mut snap = snapshot();
    snap.next_id = 0;
    assert_eq!(snap.resume_id(), 5);
}

#[test]
fn test_jsonl_store_preserves_wall_clock_timestamps() {
    let dir = temp_dir();
    let mut store = JsonlStore::new(&dir, "controller").unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    let request = snapshot().entries[0].request().clone();

    let entries: Vec<QueueEntry> = (0..500)
        .map(|id| {
            let ts = 1.7e9 + rng.random_range(0.0..1e6);
            let duration = rng.random_range(0.0..900.0);
            QueueEntry::new(id, ts, request.clone(), duration)
        })
        .collect();
    let saved = QueueSnapshot {
        entries,
        state: SchedulerState {
            incoming_requests: 500,
            potential_lost: 1_234.567_890_123,
            rejections: 3,
        },
        next_id: 500,
    };
    store.save(&saved).unwrap();

    let loaded = store.load().unwrap().unwrap();
    for (before, after) in saved.entries.iter().zip(&loaded.entries) {
        assert_eq!(before.timestamp().to_bits(), after.timestamp().to_bits());
        assert_eq!(
            before.expected_duration().to_bits(),
            after.expected_duration().to_bits()
        );
    }
    assert_eq!(loaded, saved);

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_jsonl_store_removes_temp_file_on_failed_save() {
    let dir = temp_dir();
    let mut store = JsonlStore::new(&dir, "controller").unwrap();
    // a directory in place of the snapshot file makes the final rename fail
    std::fs::create_dir_all(store.file_path().join("occupied")).unwrap();

    assert!(store.save(&snapshot()).is_err());
    assert!(!dir.join("controller.jsonl.tmp").exists());

    std::fs::remove_dir_all(dir).ok();
}
