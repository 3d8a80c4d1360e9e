//! Core scheduling abstractions, the value model, and loss accounting.

pub mod audit;
pub mod error;
pub mod fifo;
pub mod prioritizer;
pub mod request;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod value;

pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink,
};
pub use error::{AppResult, SchedulerError};
pub use fifo::FifoScheduler;
pub use prioritizer::{score_entries, sort_queue, PriorityScoring};
pub use request::{
    Coordinates, DeliveryRequest, DeliveryType, EntryId, PackageInfo, QueueEntry,
    TimeValueFunction,
};
pub use scheduler::{
    AdmissionPolicy, DeliveryScheduler, DequeueOutcome, Eviction, EvictionRescoring,
    LeastLostValueScheduler, QueueSettings,
};
pub use snapshot::{QueueSnapshot, QueueStore};
pub use state::SchedulerState;
pub use value::{delivery_value, expected_value, ValueModel};
