//! Tests for audit sink

use prometheus_llv_scheduler::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event("least_lost_value", AuditAction::Evict, Some(7), Some(60.0));
    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0], event);
    assert_eq!(events[0].entry_id, Some(7));
    assert_eq!(events[0].action, AuditAction::Evict);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("fifo", AuditAction::Enqueue, Some(1), None));
    sink.record(build_audit_event("fifo", AuditAction::Enqueue, Some(2), None));
    sink.record(build_audit_event("fifo", AuditAction::Serve, Some(1), None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].entry_id, Some(2)); // First one popped
    assert_eq!(events[1].action, AuditAction::Serve);
}

#[test]
fn test_build_audit_event() {
    let a = build_audit_event("least_lost_value", AuditAction::Reject, None, Some(12.5));
    let b = build_audit_event("least_lost_value", AuditAction::Reject, None, Some(12.5));

    assert_eq!(a.scheduler, "least_lost_value");
    assert_eq!(a.value, Some(12.5));
    assert_ne!(a.event_id, b.event_id);
    assert!(a.created_at_ms > 0);
}

#[test]
fn test_audit_action_serializes_snake_case() {
    let json = serde_json::to_string(&AuditAction::Evict).unwrap();
    assert_eq!(json, "\"evict\"");
}
