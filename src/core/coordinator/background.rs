//! Background task lifecycle
//!
//! The health monitor and the metrics aggregation loop both `select!` on a
//! shared `CancellationToken`. Shutdown cancels the token, closes the
//! tracker and waits (bounded) for the loops to leave their current tick.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Handle to the coordinator's background loops
#[derive(Debug, Clone)]
pub struct BackgroundTasks {
    token: CancellationToken,
    tracker: TaskTracker,
    grace: Duration,
}

impl BackgroundTasks {
    pub fn new(grace: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            tracker: TaskTracker::new(),
            grace,
        }
    }

    /// Spawn a tracked task that receives a child stop token
    pub fn spawn_cancellable<F, Fut>(&self, name: &'static str, task_fn: F) -> JoinHandle<()>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        debug!(task = name, "spawning background task");
        let future = task_fn(self.token.child_token());
        self.tracker.spawn(future)
    }

    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn active_tasks(&self) -> usize {
        self.tracker.len()
    }

    /// Signal every loop to stop and wait for them
    ///
    /// Returns `true` if all loops exited within the grace period.
    pub async fn shutdown(&self) -> bool {
        info!(
            active = self.tracker.len(),
            grace_ms = self.grace.as_millis() as u64,
            "stopping background tasks"
        );
        self.token.cancel();
        self.tracker.close();

        tokio::select! {
            _ = self.tracker.wait() => {
                info!("background tasks stopped");
                true
            }
            _ = tokio::time::sleep(self.grace) => {
                warn!(remaining = self.tracker.len(), "background tasks did not stop within grace period");
                false
            }
        }
    }
}
