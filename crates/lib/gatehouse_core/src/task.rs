//! Cancellable background tasks.
//!
//! Pollers, one-shot loads, the push relay and the status watcher all run as
//! a [`TaskHandle`].

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Cancellable background task with an idempotent stop.
///
/// Dropping the handle stops the task.
pub struct TaskHandle {
    cancel: CancellationToken,
    stopped: AtomicBool,
    task: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Spawn `f` with a token that is cancelled when the handle stops.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(f(cancel.clone()));
        Self {
            cancel,
            stopped: AtomicBool::new(false),
            task: Some(task),
        }
    }

    /// Stop the task. Returns `true` only for the call that actually stopped it.
    pub fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.cancel.cancel();
        true
    }

    pub fn is_active(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst)
    }

    /// Stop and wait for the task to wind down.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
            && e.is_panic()
        {
            warn!("background task panicked: {e}");
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("active", &self.is_active())
            .finish()
    }
}
