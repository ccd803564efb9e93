use std::{future::Future, sync::Arc};

use tokio::sync::Mutex;
use tokio_util::task::TaskTracker;

/// Tracks fire-and-forget tasks so shutdown can wait for them.
///
/// Tasks run on the tokio runtime independently of whoever spawned them:
/// dropping the caller's future does not cancel them.
#[derive(Clone)]
pub struct BackgroundTasks {
    tracker: TaskTracker,
    drain_lock: Arc<Mutex<()>>,
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tracker: TaskTracker::new(),
            drain_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn(task);
    }

    /// Number of tasks that have not completed yet.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every task spawned so far has completed.
    ///
    /// The tracker accepts new tasks again afterwards. Concurrent drains run
    /// one after another.
    pub async fn drain(&self) {
        let _guard = self.drain_lock.lock().await;
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
