//! Polling synchronizer: keeps a local snapshot in step with the backend.
//!
//! A [`Synchronizer`] owns a fetch closure and publishes [`Snapshot`]s on a
//! `watch` channel. [`Synchronizer::start`] runs it periodically and returns a
//! [`TaskHandle`]; stopping (or dropping) the handle cancels the timer. A
//! fetch already in flight when the handle stops may complete, but its result
//! is discarded.
//!
//! The `watch` channel only keeps the latest snapshot. Consumers that must see
//! every fetched list in order (the status diff) use [`Synchronizer::fetched`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::task::TaskHandle;

/// Fetched lists buffered per [`Synchronizer::fetched`] receiver.
const FETCHED_CAPACITY: usize = 16;

type FetchFn<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

/// Local view state published by a [`Synchronizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    /// Last successfully fetched data.
    pub data: T,
    /// True until the first fetch completes (successfully or not).
    pub loading: bool,
    /// Inline error message, cleared by the next successful fetch.
    pub error: Option<String>,
    /// Number of successful fetches applied so far.
    pub revision: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl<T: Default> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            loading: true,
            error: None,
            revision: 0,
            refreshed_at: None,
        }
    }
}

/// Fetch-and-publish loop over one remote list.
pub struct Synchronizer<T> {
    label: Arc<str>,
    fetch: FetchFn<T>,
    state: Arc<watch::Sender<Snapshot<T>>>,
    fetched: broadcast::Sender<T>,
}

impl<T> Clone for Synchronizer<T> {
    fn clone(&self) -> Self {
        Self {
            label: Arc::clone(&self.label),
            fetch: Arc::clone(&self.fetch),
            state: Arc::clone(&self.state),
            fetched: self.fetched.clone(),
        }
    }
}

impl<T> Synchronizer<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    /// `label` names the resource in error messages ("Failed to load <label>").
    pub fn new<F, Fut>(label: &str, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let fetch: FetchFn<T> = Arc::new(move || fetch().boxed());
        let (state, _) = watch::channel(Snapshot::default());
        let (fetched, _) = broadcast::channel(FETCHED_CAPACITY);
        Self {
            label: Arc::from(label),
            fetch,
            state: Arc::new(state),
            fetched,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.state.borrow().clone()
    }

    /// Every successfully fetched list, in order, from now on.
    ///
    /// Unlike [`subscribe`](Self::subscribe), two fetches landing before the
    /// receiver runs are both delivered.
    pub fn fetched(&self) -> broadcast::Receiver<T> {
        self.fetched.subscribe()
    }

    /// Fetch once and publish the outcome.
    ///
    /// Returns `false` if the fetch failed.
    pub async fn refresh(&self) -> bool {
        let result = (self.fetch)().await;
        self.apply(result)
    }

    /// Fetch once, publishing only if `cancel` has not fired meanwhile.
    async fn refresh_unless_cancelled(&self, cancel: &CancellationToken) {
        let result = (self.fetch)().await;
        if cancel.is_cancelled() {
            debug!(label = %self.label, "discarding fetch result after stop");
            return;
        }
        self.apply(result);
    }

    fn apply(&self, result: Result<T, ApiError>) -> bool {
        match result {
            Ok(data) => {
                // No receivers is fine.
                let _ = self.fetched.send(data.clone());
                self.state.send_modify(|s| {
                    s.data = data;
                    s.loading = false;
                    s.error = None;
                    s.revision += 1;
                    s.refreshed_at = Some(Utc::now());
                });
                true
            }
            Err(e) => {
                warn!(label = %self.label, "fetch failed: {e}");
                let message = format!("Failed to load {}: {e}", self.label);
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
                false
            }
        }
    }

    /// Surface an error produced outside the fetch (e.g. a failed command).
    pub fn report_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.state.send_modify(|s| s.error = Some(message));
    }

    /// Fetch once in the background. Stopping the handle before the fetch
    /// lands discards its result.
    pub fn load_once(&self) -> TaskHandle {
        let sync = self.clone();
        TaskHandle::spawn(move |cancel| async move {
            sync.refresh_unless_cancelled(&cancel).await;
        })
    }

    /// Fetch immediately, then every `interval` until the handle stops.
    ///
    /// Fetches never overlap within one synchronizer's loop; a slow fetch
    /// delays the next tick instead of bunching ticks up.
    pub fn start(&self, interval: Duration) -> TaskHandle {
        let sync = self.clone();
        debug!(label = %self.label, ?interval, "starting poller");
        TaskHandle::spawn(move |cancel| async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                sync.refresh_unless_cancelled(&cancel).await;
            }
            debug!(label = %sync.label, "poller stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn counting(fail_first: bool) -> (Synchronizer<u32>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let sync = Synchronizer::new("visitors", move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if fail_first && n == 1 {
                    Err(ApiError::Network("boom".into()))
                } else {
                    Ok(n)
                }
            }
        });
        (sync, calls)
    }

    #[test]
    fn initial_snapshot_is_loading() {
        let (sync, calls) = counting(false);
        let snap = sync.snapshot();
        assert!(snap.loading);
        assert_eq!(snap.revision, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_immediately_on_start() {
        let (sync, calls) = counting(false);
        let mut rx = sync.subscribe();
        let handle = sync.start(Duration::from_secs(3));
        rx.changed().await.expect("first publish");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(rx.borrow().data, 1);
        assert!(!rx.borrow().loading);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn polls_on_fixed_period() {
        let (sync, calls) = counting(false);
        let handle = sync.start(Duration::from_secs(3));
        tokio::time::sleep(Duration::from_millis(7_000)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(sync.snapshot().revision, 3);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_further_fetches() {
        let (sync, calls) = counting(false);
        let handle = sync.start(Duration::from_secs(3));
        tokio::time::sleep(Duration::from_millis(4_000)).await;
        assert!(handle.stop());
        let at_stop = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), at_stop);
        assert!(!handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent() {
        let (sync, _) = counting(false);
        let handle = sync.start(Duration::from_secs(3));
        assert!(handle.stop());
        assert!(!handle.stop());
        assert!(!handle.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_polling() {
        let (sync, calls) = counting(false);
        {
            let _handle = sync.start(Duration::from_secs(3));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        let at_drop = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), at_drop);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_surfaces_error_and_polling_continues() {
        let (sync, calls) = counting(true);
        let handle = sync.start(Duration::from_secs(3));
        tokio::time::sleep(Duration::from_millis(100)).await;
        let snap = sync.snapshot();
        assert_eq!(
            snap.error.as_deref(),
            Some("Failed to load visitors: Network error: boom")
        );
        assert!(!snap.loading);
        assert_eq!(snap.revision, 0);

        tokio::time::sleep(Duration::from_secs(3)).await;
        let snap = sync.snapshot();
        assert!(snap.error.is_none());
        assert_eq!(snap.data, 2);
        assert!(calls.load(Ordering::SeqCst) >= 2);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_result_discarded_after_stop() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let sync = Synchronizer::new("events", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok(42u32)
            }
        });
        let handle = sync.start(Duration::from_secs(3));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(sync.snapshot().revision, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn load_once_fetches_a_single_time() {
        let (sync, calls) = counting(false);
        let handle = sync.load_once();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sync.snapshot().revision, 1);
        drop(handle);
    }

    #[tokio::test]
    async fn fetched_delivers_every_result() {
        let (sync, _) = counting(true);
        let mut rx = sync.fetched();
        sync.refresh().await;
        sync.refresh().await;
        sync.refresh().await;
        assert_eq!(rx.recv().await.ok(), Some(2));
        assert_eq!(rx.recv().await.ok(), Some(3));
        assert!(rx.try_recv().is_err());
        assert_eq!(sync.subscribe().borrow().data, 3);
    }

    #[tokio::test]
    async fn refresh_and_report_error() {
        let (sync, _) = counting(false);
        assert!(sync.refresh().await);
        sync.report_error("Check In failed: nope");
        let snap = sync.snapshot();
        assert_eq!(snap.data, 1);
        assert_eq!(snap.error.as_deref(), Some("Check In failed: nope"));
        assert!(sync.refresh().await);
        assert!(sync.snapshot().error.is_none());
    }
}
