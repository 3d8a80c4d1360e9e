//! Service layer: serialized scheduler access and the loops that drive it.

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod dispatch;
pub mod service;

pub use api::{DeliveryResponse, MetricsSnapshot};
#[cfg(feature = "tokio-runtime")]
pub use dispatch::{run_dispatch_loop, run_metrics_reporter, Dispatcher};
pub use service::SchedulerService;
