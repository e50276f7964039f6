//! Periodic queue drain.
//!
//! [`DrainScheduler`] runs as a background task. On every tick it drains
//! batches of `batch_size` until a batch comes back short, so a backlog is
//! worked off in chunks without one unbounded claim.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::queue::NotificationQueue;

/// Background service that drains the notification queue.
pub struct DrainScheduler {
    queue: Arc<NotificationQueue>,
    interval: Duration,
    batch_size: i64,
}

impl DrainScheduler {
    pub fn new(queue: Arc<NotificationQueue>, interval: Duration, batch_size: i64) -> Self {
        Self {
            queue,
            interval,
            batch_size: batch_size.max(1),
        }
    }

    /// Run the drain loop until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Drain scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    self.drain_backlog(&cancel).await;
                }
            }
        }
    }

    /// Drain batches until the queue is empty, a claim fails or `cancel`
    /// fires. Returns the number of items processed.
    pub async fn drain_backlog(&self, cancel: &CancellationToken) -> usize {
        let mut processed = 0;
        while !cancel.is_cancelled() {
            match self.queue.drain(self.batch_size).await {
                Ok(report) => {
                    processed += report.processed();
                    if (report.claimed as i64) < self.batch_size {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to drain notification queue");
                    break;
                }
            }
        }
        processed
    }
}
