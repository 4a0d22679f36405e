//! Resident dashboard: own visitors, approvals, arrival notices and chat.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use super::chat::ChatSession;
use super::{DashboardError, run_and_reconcile};
use crate::api::Backend;
use crate::models::{ChatMessage, Visitor, VisitorId, VisitorStatus};
use crate::notify::{NotificationSink, StatusWatcher};
use crate::poll::{Snapshot, Synchronizer};
use crate::task::TaskHandle;

/// Visitors awaiting the resident's decision.
pub fn awaiting_approval(visitors: &[Visitor]) -> Vec<&Visitor> {
    visitors
        .iter()
        .filter(|v| v.status == VisitorStatus::Pending)
        .collect()
}

pub struct ResidentDashboard {
    backend: Arc<dyn Backend>,
    sync: Synchronizer<Vec<Visitor>>,
    sink: Arc<dyn NotificationSink>,
    poll_interval: Duration,
    poller: Option<TaskHandle>,
    watcher: Option<TaskHandle>,
    chat: ChatSession,
}

impl ResidentDashboard {
    pub fn new(backend: Arc<dyn Backend>, sink: Arc<dyn NotificationSink>, poll_interval: Duration) -> Self {
        let fetcher = backend.clone();
        let sync = Synchronizer::new("visitors", move || {
            let backend = fetcher.clone();
            async move { backend.list_visitors().await }
        });
        Self {
            chat: ChatSession::new(backend.clone()),
            backend,
            sync,
            sink,
            poll_interval,
            poller: None,
            watcher: None,
        }
    }

    /// Start polling and watching for status transitions.
    ///
    /// The watcher subscribes before the first fetch so that fetch becomes
    /// its baseline.
    pub fn mount(&mut self) {
        self.unmount();
        self.watcher = Some(spawn_status_watcher(&self.sync, self.sink.clone()));
        self.poller = Some(self.sync.start(self.poll_interval));
    }

    pub fn unmount(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        if let Some(watcher) = self.watcher.take() {
            watcher.stop();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.poller.as_ref().is_some_and(TaskHandle::is_active)
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Vec<Visitor>>> {
        self.sync.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot<Vec<Visitor>> {
        self.sync.snapshot()
    }

    pub async fn refresh(&self) -> bool {
        self.sync.refresh().await
    }

    pub async fn approve(&self, id: VisitorId) -> Result<(), DashboardError> {
        run_and_reconcile(&self.sync, "Approve", id, self.backend.approve(id)).await
    }

    pub async fn deny(&self, id: VisitorId) -> Result<(), DashboardError> {
        run_and_reconcile(&self.sync, "Deny", id, self.backend.deny(id)).await
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.chat.messages()
    }

    /// Send a chat message; see [`ChatSession::send`].
    pub async fn send_message(&mut self, text: &str) -> Option<&ChatMessage> {
        self.chat.send(text).await
    }
}

impl Drop for ResidentDashboard {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Feed every fetched visitor list through a [`StatusWatcher`].
///
/// Reads [`Synchronizer::fetched`] rather than the snapshot channel so that
/// two polls landing back to back are both diffed. A list already fetched
/// before the watcher starts becomes its baseline.
fn spawn_status_watcher(
    sync: &Synchronizer<Vec<Visitor>>,
    sink: Arc<dyn NotificationSink>,
) -> TaskHandle {
    let mut rx = sync.fetched();
    let current = sync.snapshot();
    TaskHandle::spawn(move |cancel| async move {
        let mut watcher = StatusWatcher::new();
        if current.revision > 0 {
            watcher.observe(&current.data);
        }
        loop {
            let visitors = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                received = rx.recv() => match received {
                    Ok(visitors) => visitors,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "status watcher lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };
            for note in watcher.observe(&visitors) {
                sink.notify(note);
            }
        }
        debug!("status watcher stopped");
    })
}
