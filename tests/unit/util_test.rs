//! Tests for utility functions

use prometheus_llv_scheduler::core::{build_audit_event, AuditAction, AuditSink, TracingAuditSink};
use prometheus_llv_scheduler::util::{init_tracing, Clock, ManualClock, SystemClock};

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    let mut sink = TracingAuditSink;
    sink.record(build_audit_event("fifo", AuditAction::Serve, Some(1), None));
}

#[test]
fn test_manual_clock_drives_time() {
    let clock = ManualClock::new(0.0);
    clock.advance(1.5);
    clock.advance(1.5);
    assert!((clock.now_secs() - 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_system_clock_moves_forward() {
    let a = SystemClock.now_secs();
    let b = SystemClock.now_secs();
    assert!(b >= a);
}
