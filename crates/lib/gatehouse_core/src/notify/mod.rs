//! Notification relay.
//!
//! Two independent producers feed a [`NotificationSink`]: the push channel
//! ([`push::NotificationRelay`]) and the visitor-status diff
//! ([`status::StatusWatcher`]). Neither depends on the other.

pub mod push;
pub mod registration;
pub mod status;

use std::fmt;
use std::sync::Mutex;

use tracing::info;

pub use push::{
    LocalPushChannel, NotificationRelay, PushChannel, PushMessage, RelayHandle,
    background_notification,
};
pub use registration::{DeviceRegistration, RegistrationOutcome};
pub use status::StatusWatcher;

/// Where a notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSource {
    /// Push message received while the client is running.
    Foreground,
    /// Push message delivered through the background path.
    Background,
    /// Local diff of two consecutive visitor polls.
    StatusChange,
}

impl fmt::Display for NotificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotificationSource::Foreground => "foreground",
            NotificationSource::Background => "background",
            NotificationSource::StatusChange => "status-change",
        })
    }
}

/// A title/body pair to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub source: NotificationSource,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>, source: NotificationSource) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            source,
        }
    }
}

/// Surfaces notifications to the user.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Logs every notification at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, n: Notification) {
        info!(source = %n.source, title = %n.title, "{}", n.body);
    }
}

/// Collects notifications in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    pub fn received(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.received.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        if let Ok(mut received) = self.received.lock() {
            received.push(notification);
        }
    }
}
