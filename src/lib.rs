//! # Prometheus LLV Scheduler
//!
//! An economic admission-control scheduler for delivery requests whose
//! revenue decays with time.
//!
//! Requests are queued without blocking. Each time the dispatch side asks for
//! work, the whole queue is rescored: every entry is weighed by how much
//! value the rest of the queue would lose if it went first, against how much
//! it would lose itself by waiting. Entries beyond the configured capacity
//! are evicted lowest-score first, their value is tallied as lost potential,
//! and the highest-scoring entry is served.
//!
//! ## Key Features
//!
//! - **Time-value model**: staged revenue decay with a hard delivery-time limit
//! - **Least-lost-value ordering**: O(n²) global rescoring before every dequeue
//! - **Lazy capacity enforcement**: eviction at dequeue with loss accounting
//! - **Alternate policies**: FIFO sibling, bounded admission, per-eviction rescoring
//! - **Persistent queues**: snapshots survive restarts
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prometheus_llv_scheduler::config::SchedulerConfig;
//! use prometheus_llv_scheduler::core::{Coordinates, DeliveryRequest, DeliveryType, PackageInfo};
//! use prometheus_llv_scheduler::runtime::SchedulerService;
//! use prometheus_llv_scheduler::util::SystemClock;
//!
//! let cfg = SchedulerConfig::from_env()?;
//! let service = SchedulerService::from_config(&cfg, Arc::new(SystemClock))?;
//!
//! let tvf = cfg.linear_time_value(DeliveryType::Standard)?;
//! let request = DeliveryRequest::new(Coordinates::new(800.0, 0.0, 300.0), PackageInfo::new(40.0, 1), tvf);
//! assert!(service.enqueue(request).accepted);
//!
//! if let Some(entry) = service.next_request() {
//!     // hand `entry` to the delivery fleet
//! }
//! println!("{:?}", service.metrics());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Value model, prioritizer, and admission/eviction controllers.
pub mod core;
/// Configuration models for the scheduler and its backends.
pub mod config;
/// Builders to construct schedulers and stores from configuration.
pub mod builders;
/// Infrastructure adapters for snapshot persistence.
pub mod infra;
/// Serialized service handle and runtime loops.
pub mod runtime;
/// Shared utilities.
pub mod util;
