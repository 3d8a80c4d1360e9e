//! Tests for configuration validation

use std::collections::HashMap;
use std::path::PathBuf;

use prometheus_llv_scheduler::config::{SchedulerConfig, SchedulerPolicy, StoreBackendConfig};
use prometheus_llv_scheduler::core::{
    AdmissionPolicy, DeliveryType, EvictionRescoring, PriorityScoring, QueueSettings,
    SchedulerError,
};

#[test]
fn test_default_config_is_valid() {
    let cfg = SchedulerConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.capacity, 30);
    assert_eq!(cfg.policy, SchedulerPolicy::LeastLostValue);
    assert_eq!(cfg.admission, AdmissionPolicy::Deferred);
    assert_eq!(cfg.eviction_rescoring, EvictionRescoring::SinglePass);
}

#[test]
fn test_config_invalid_capacity() {
    let cfg = SchedulerConfig {
        capacity: 0,
        ..SchedulerConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(SchedulerError::InvalidConfig(_))));
}

#[test]
fn test_config_invalid_speed() {
    for speed in [0.0, -3.0, f64::NAN, f64::INFINITY] {
        let cfg = SchedulerConfig {
            max_speed: speed,
            ..SchedulerConfig::default()
        };
        assert!(cfg.validate().is_err(), "speed {speed} accepted");
    }
}

#[test]
fn test_config_invalid_file_stream() {
    let cfg = SchedulerConfig {
        store: StoreBackendConfig::File {
            dir: PathBuf::from("/tmp"),
            stream: String::new(),
        },
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "capacity": 12,
        "max_speed": 15.0,
        "policy": "fifo",
        "admission": "bounded",
        "eviction_rescoring": "per_eviction",
        "scoring": "displacement",
        "origin": { "x": 1.0, "y": 0.0, "z": -4.0 },
        "store": { "kind": "file", "dir": "/var/lib/llv", "stream": "controller-1" }
    }"#;

    let cfg = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.capacity, 12);
    assert_eq!(cfg.policy, SchedulerPolicy::Fifo);
    assert_eq!(cfg.admission, AdmissionPolicy::Bounded);
    assert_eq!(cfg.eviction_rescoring, EvictionRescoring::PerEviction);
    assert_eq!(cfg.scoring, PriorityScoring::Displacement);
    assert!((cfg.origin.z + 4.0).abs() < f64::EPSILON);
    // unspecified fields keep their defaults
    assert!((cfg.step_interval - 60.0).abs() < f64::EPSILON);
    assert_eq!(
        cfg.store,
        StoreBackendConfig::File {
            dir: PathBuf::from("/var/lib/llv"),
            stream: "controller-1".into()
        }
    );
}

#[test]
fn test_config_from_json_rejects_invalid() {
    assert!(SchedulerConfig::from_json_str(r#"{ "capacity": 0 }"#).is_err());
    assert!(SchedulerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_config_from_lookup_overrides() {
    let vars: HashMap<&str, &str> = [
        ("LLV_CAPACITY", "7"),
        ("LLV_TIER_MULTIPLIER", "3.0"),
        ("LLV_POLICY", "fifo"),
        ("LLV_STORE_DIR", "/tmp/llv"),
        ("LLV_AUDIT_LOG", "true"),
    ]
    .into_iter()
    .collect();

    let cfg = SchedulerConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
    assert_eq!(cfg.capacity, 7);
    assert!((cfg.tier_multiplier - 3.0).abs() < f64::EPSILON);
    assert_eq!(cfg.policy, SchedulerPolicy::Fifo);
    assert!(cfg.audit_log);
    assert_eq!(
        cfg.store,
        StoreBackendConfig::File {
            dir: PathBuf::from("/tmp/llv"),
            stream: "scheduler".into()
        }
    );
}

#[test]
fn test_config_from_lookup_bad_value() {
    let err = SchedulerConfig::from_lookup(|k| (k == "LLV_CAPACITY").then(|| "lots".to_string()))
        .unwrap_err();
    assert!(err.to_string().contains("LLV_CAPACITY"));
}

#[test]
fn test_config_from_file_missing() {
    let err = SchedulerConfig::from_file("/definitely/not/here.json").unwrap_err();
    assert!(format!("{err:#}").contains("reading config"));
}

#[test]
fn test_queue_settings_from_config() {
    let cfg = SchedulerConfig::default();
    let settings = QueueSettings::from(&cfg);
    assert_eq!(settings.capacity, cfg.capacity);
    assert_eq!(settings.model, cfg.value_model());
}

#[test]
fn test_time_value_presets_follow_step_count() {
    let cfg = SchedulerConfig {
        tvf_steps: 12,
        ..SchedulerConfig::default()
    };
    let linear = cfg.linear_time_value(DeliveryType::Standard).unwrap();
    assert_eq!(linear.steps().len(), 12);
    assert_eq!(linear.num_steps(), 12);
    let two_stage = cfg.two_stage_time_value(DeliveryType::Express).unwrap();
    assert_eq!(two_stage.num_steps(), 2);
}
