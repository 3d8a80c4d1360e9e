//! Tokio loops driving a [`SchedulerService`].
//!
//! The dispatch loop pulls one request per tick and hands it to an external
//! [`Dispatcher`]. The metrics loop reports queue size and lost potential at
//! a slower cadence. Both stop when the shutdown flag flips to `true` or its
//! sender is dropped.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::core::{AppResult, QueueEntry};
use crate::runtime::service::SchedulerService;

/// Collaborator that physically carries out a served request.
#[async_trait]
pub trait Dispatcher: Send + Sync + 'static {
    /// Execute `entry`. Errors are logged; the entry is not re-queued.
    async fn dispatch(&self, entry: QueueEntry) -> AppResult<()>;
}

async fn stop_requested(shutdown: &mut watch::Receiver<bool>) -> bool {
    match shutdown.changed().await {
        Ok(()) => *shutdown.borrow(),
        Err(_) => true,
    }
}

/// Serve one request per `period` until shutdown. Returns how many
/// requests were dispatched successfully.
pub async fn run_dispatch_loop<D: Dispatcher>(
    service: SchedulerService,
    dispatcher: Arc<D>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> usize {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut dispatched = 0;
    tracing::info!(?period, "dispatch loop started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(entry) = service.next_request() else {
                    continue;
                };
                let id = entry.id();
                match dispatcher.dispatch(entry).await {
                    Ok(()) => {
                        dispatched += 1;
                        tracing::debug!(entry = id, "request dispatched");
                    }
                    Err(e) => tracing::warn!(entry = id, "dispatch failed: {e:#}"),
                }
            }
            stop = stop_requested(&mut shutdown) => {
                if stop {
                    break;
                }
            }
        }
    }

    tracing::info!(dispatched, "dispatch loop stopped");
    dispatched
}

/// Log a metrics snapshot every `period` until shutdown. Returns the number
/// of reports emitted.
pub async fn run_metrics_reporter(
    service: SchedulerService,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> usize {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut reports = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let m = service.metrics();
                tracing::info!(
                    policy = %m.policy,
                    queue_size = m.queue_size,
                    incoming = m.incoming_requests,
                    potential_lost = m.potential_lost,
                    avg_potential_lost = ?m.avg_potential_lost,
                    rejections = m.rejections,
                    "scheduler metrics"
                );
                reports += 1;
            }
            stop = stop_requested(&mut shutdown) => {
                if stop {
                    break;
                }
            }
        }
    }
    reports
}
