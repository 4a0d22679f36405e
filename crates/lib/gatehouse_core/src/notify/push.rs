//! Push-message channel and the relay that surfaces it.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{Notification, NotificationSink, NotificationSource};
use crate::task::TaskHandle;

pub const DEFAULT_TITLE: &str = "New Notification";
pub const DEFAULT_BODY: &str = "You have a new update.";

/// A message as delivered by the push provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushMessage {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Deserialize)]
struct Payload {
    #[serde(default)]
    notification: Option<PayloadContent>,
}

#[derive(Deserialize)]
struct PayloadContent {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

impl PushMessage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    /// Read `notification.title` / `notification.body` from a provider payload.
    ///
    /// Anything missing or malformed is left empty.
    pub fn from_payload(payload: &Value) -> Self {
        let content = Payload::deserialize(payload)
            .ok()
            .and_then(|p| p.notification);
        match content {
            Some(c) => Self {
                title: c.title,
                body: c.body,
            },
            None => Self::default(),
        }
    }

    pub fn into_notification(self, source: NotificationSource) -> Notification {
        Notification::new(
            non_empty(self.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            non_empty(self.body).unwrap_or_else(|| DEFAULT_BODY.to_string()),
            source,
        )
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// Background delivery: the client is not running a relay, so the payload
/// is turned into a notification directly.
pub fn background_notification(payload: &Value) -> Notification {
    PushMessage::from_payload(payload).into_notification(NotificationSource::Background)
}

/// Subscribe/publish channel standing in for the push provider.
pub trait PushChannel: Send + Sync {
    /// A fresh subscription. Dropping the stream unsubscribes.
    fn subscribe(&self) -> BoxStream<'static, PushMessage>;
}

/// In-process [`PushChannel`] backed by a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct LocalPushChannel {
    tx: broadcast::Sender<PushMessage>,
}

impl Default for LocalPushChannel {
    fn default() -> Self {
        Self::new(64)
    }
}

impl LocalPushChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Deliver to every live subscription. Returns how many received it.
    pub fn publish(&self, message: PushMessage) -> usize {
        self.tx.send(message).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl PushChannel for LocalPushChannel {
    fn subscribe(&self) -> BoxStream<'static, PushMessage> {
        stream::unfold(self.tx.subscribe(), |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(msg) => return Some((msg, rx)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "push subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}

/// Foreground delivery: forwards every push message to a sink.
pub struct NotificationRelay;

impl NotificationRelay {
    /// Subscribe to `channel` and forward to `sink` until detached.
    ///
    /// The subscription is taken before this returns, so nothing published
    /// afterwards is missed.
    pub fn attach(channel: &dyn PushChannel, sink: Arc<dyn NotificationSink>) -> RelayHandle {
        let mut messages = channel.subscribe();
        debug!("push relay attached");
        let task = TaskHandle::spawn(move |cancel| async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    msg = messages.next() => match msg {
                        Some(msg) => sink.notify(msg.into_notification(NotificationSource::Foreground)),
                        None => break,
                    },
                }
            }
            debug!("push relay detached");
        });
        RelayHandle { task }
    }
}

/// Live push subscription. Dropping it detaches.
#[derive(Debug)]
pub struct RelayHandle {
    task: TaskHandle,
}

impl RelayHandle {
    /// Cancel the subscription. Returns `true` only the first time.
    pub fn detach(&self) -> bool {
        self.task.stop()
    }

    pub fn is_attached(&self) -> bool {
        self.task.is_active()
    }

    /// Detach and wait until the subscription is released.
    pub async fn shutdown(self) {
        self.task.shutdown().await;
    }
}
