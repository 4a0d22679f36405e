//! Admin dashboard: operations board, user directory and audit log tabs.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use super::format::{AuditRow, UserRow};
use super::guard::GuardDashboard;
use crate::api::Backend;
use crate::models::{AuditEvent, User};
use crate::poll::{Snapshot, Synchronizer};
use crate::task::TaskHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdminTab {
    #[default]
    Operations,
    Users,
    Audit,
}

impl AdminTab {
    pub const ALL: [AdminTab; 3] = [AdminTab::Operations, AdminTab::Users, AdminTab::Audit];

    pub fn label(&self) -> &'static str {
        match self {
            AdminTab::Operations => "Daily Operations",
            AdminTab::Users => "User Management",
            AdminTab::Audit => "Audit Log",
        }
    }
}

impl fmt::Display for AdminTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Polled audit log.
pub struct AuditLogView {
    sync: Synchronizer<Vec<AuditEvent>>,
    poll_interval: Duration,
    poller: Option<TaskHandle>,
}

impl AuditLogView {
    pub fn new(backend: Arc<dyn Backend>, poll_interval: Duration) -> Self {
        let sync = Synchronizer::new("audit log", move || {
            let backend = backend.clone();
            async move { backend.list_events().await }
        });
        Self {
            sync,
            poll_interval,
            poller: None,
        }
    }

    pub fn mount(&mut self) {
        self.unmount();
        self.poller = Some(self.sync.start(self.poll_interval));
    }

    pub fn unmount(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.poller.as_ref().is_some_and(TaskHandle::is_active)
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Vec<AuditEvent>>> {
        self.sync.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot<Vec<AuditEvent>> {
        self.sync.snapshot()
    }

    pub async fn refresh(&self) -> bool {
        self.sync.refresh().await
    }

    /// Rendered rows in server order.
    pub fn rows(&self) -> Vec<AuditRow> {
        self.sync.snapshot().data.iter().map(AuditRow::from_event).collect()
    }
}

/// User list, fetched once per mount.
pub struct UserDirectory {
    sync: Synchronizer<Vec<User>>,
    loader: Option<TaskHandle>,
}

impl UserDirectory {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let sync = Synchronizer::new("users", move || {
            let backend = backend.clone();
            async move { backend.list_users().await }
        });
        Self { sync, loader: None }
    }

    pub fn mount(&mut self) {
        self.unmount();
        self.loader = Some(self.sync.load_once());
    }

    pub fn unmount(&mut self) {
        if let Some(loader) = self.loader.take() {
            loader.stop();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.loader.as_ref().is_some_and(TaskHandle::is_active)
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Vec<User>>> {
        self.sync.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot<Vec<User>> {
        self.sync.snapshot()
    }

    pub async fn refresh(&self) -> bool {
        self.sync.refresh().await
    }

    pub fn rows(&self) -> Vec<UserRow> {
        self.sync.snapshot().data.iter().map(UserRow::from).collect()
    }
}

/// Tabbed admin view. Only the active tab is mounted at any time.
pub struct AdminDashboard {
    operations: GuardDashboard,
    users: UserDirectory,
    audit: AuditLogView,
    active: AdminTab,
    mounted: bool,
}

impl AdminDashboard {
    pub fn new(backend: Arc<dyn Backend>, poll_interval: Duration) -> Self {
        Self {
            operations: GuardDashboard::new(backend.clone(), poll_interval),
            users: UserDirectory::new(backend.clone()),
            audit: AuditLogView::new(backend, poll_interval),
            active: AdminTab::default(),
            mounted: false,
        }
    }

    pub fn mount(&mut self) {
        self.mounted = true;
        self.mount_tab(self.active);
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.unmount_tab(self.active);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn active_tab(&self) -> AdminTab {
        self.active
    }

    /// Switch tabs, tearing down the old tab's polling before the new one
    /// starts.
    pub fn select_tab(&mut self, tab: AdminTab) {
        if tab == self.active {
            return;
        }
        debug!(from = %self.active, to = %tab, "admin tab changed");
        if self.mounted {
            self.unmount_tab(self.active);
            self.mount_tab(tab);
        }
        self.active = tab;
    }

    fn mount_tab(&mut self, tab: AdminTab) {
        match tab {
            AdminTab::Operations => self.operations.mount(),
            AdminTab::Users => self.users.mount(),
            AdminTab::Audit => self.audit.mount(),
        }
    }

    fn unmount_tab(&mut self, tab: AdminTab) {
        match tab {
            AdminTab::Operations => self.operations.unmount(),
            AdminTab::Users => self.users.unmount(),
            AdminTab::Audit => self.audit.unmount(),
        }
    }

    pub fn operations(&self) -> &GuardDashboard {
        &self.operations
    }

    pub fn operations_mut(&mut self) -> &mut GuardDashboard {
        &mut self.operations
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn audit(&self) -> &AuditLogView {
        &self.audit
    }
}

impl Drop for AdminDashboard {
    fn drop(&mut self) {
        self.unmount();
    }
}
