//! Tests for error types

use prometheus_llv_scheduler::core::SchedulerError;

#[test]
fn test_invalid_time_value_error() {
    let err = SchedulerError::InvalidTimeValue("num_steps must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid time-value function: num_steps must be greater than 0"
    );
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("capacity must be greater than 0".to_string());
    assert_eq!(format!("{}", err), "invalid config: capacity must be greater than 0");
}

#[test]
fn test_store_error() {
    let err = SchedulerError::Store("disk full".to_string());
    assert_eq!(format!("{}", err), "store error: disk full");
}

#[test]
fn test_serialization_error_from_serde() {
    let serde_err = serde_json::from_str::<u32>("nope").unwrap_err();
    let err: SchedulerError = serde_err.into();
    assert!(format!("{}", err).starts_with("serialization error:"));
}
