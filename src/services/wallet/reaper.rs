//! Periodic expiry sweep
//!
//! A single task drives [`LifecycleManager::sweep_expired`] on a fixed
//! interval. The sweep is awaited inline and missed ticks are skipped, so a
//! slow backend can never stack up concurrent passes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::LifecycleManager;

pub struct Reaper {
    manager: Arc<LifecycleManager>,
    interval: Duration,
}

impl Reaper {
    pub fn new(manager: Arc<LifecycleManager>, interval: Duration) -> Self {
        Self { manager, interval }
    }

    /// Start the reaper on the current runtime
    pub fn spawn(self) -> ReaperHandle {
        let token = CancellationToken::new();
        let task = tokio::spawn(self.run(token.clone()));
        ReaperHandle { token, task }
    }

    /// Sweep every `interval` until `token` is cancelled
    ///
    /// The first pass runs one interval after start. Cancellation is only
    /// observed between passes; a pass in progress runs to completion.
    pub async fn run(self, token: CancellationToken) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!("Reaper started, sweeping every {}s", self.interval.as_secs());

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    tracing::debug!("Reaper tick");
                    let report = self.manager.sweep_expired().await;
                    if !report.is_empty() {
                        tracing::info!(
                            swept = report.swept.len(),
                            skipped = report.skipped.len(),
                            failed = report.failed.len(),
                            "Reaper pass complete"
                        );
                    }
                }
            }
        }

        tracing::info!("Reaper stopped");
    }
}

/// Owner of a running reaper task
pub struct ReaperHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Cancel the reaper and wait for its current pass to finish
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            tracing::error!("Reaper task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
