//! Operations board used by guards (and by admins as their first tab).

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tokio::sync::watch;
use tracing::debug;

use super::board::{DayBoard, GuardTab, TabCounts};
use super::{DashboardError, run_and_reconcile};
use crate::api::Backend;
use crate::models::{Visitor, VisitorId};
use crate::poll::{Snapshot, Synchronizer};
use crate::task::TaskHandle;

/// Everything needed to render the board once.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardView {
    pub date: NaiveDate,
    pub tab: GuardTab,
    pub counts: TabCounts,
    /// Visitors of `date` in `tab`.
    pub visitors: Vec<Visitor>,
    pub loading: bool,
    pub error: Option<String>,
}

impl GuardView {
    pub fn from_snapshot(snapshot: &Snapshot<Vec<Visitor>>, date: NaiveDate, tab: GuardTab) -> Self {
        let board = DayBoard::build(&snapshot.data, date);
        Self {
            date,
            tab,
            counts: board.counts(),
            visitors: board.tab(tab).into_iter().cloned().collect(),
            loading: snapshot.loading,
            error: snapshot.error.clone(),
        }
    }
}

/// Guard dashboard: a polled visitor list, a selected day and tab, and the
/// check-in/check-out commands.
pub struct GuardDashboard {
    backend: Arc<dyn Backend>,
    sync: Synchronizer<Vec<Visitor>>,
    poll_interval: Duration,
    poller: Option<TaskHandle>,
    selected_date: NaiveDate,
    active_tab: GuardTab,
}

impl GuardDashboard {
    pub fn new(backend: Arc<dyn Backend>, poll_interval: Duration) -> Self {
        let fetcher = backend.clone();
        let sync = Synchronizer::new("visitors", move || {
            let backend = fetcher.clone();
            async move { backend.list_visitors().await }
        });
        Self {
            backend,
            sync,
            poll_interval,
            poller: None,
            selected_date: Local::now().date_naive(),
            active_tab: GuardTab::Expected,
        }
    }

    /// Start polling. Any previous poller is stopped first.
    pub fn mount(&mut self) {
        if let Some(old) = self.poller.take() {
            old.stop();
        }
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

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    /// Change the day. Polling restarts when mounted.
    pub fn select_date(&mut self, date: NaiveDate) {
        if date == self.selected_date {
            return;
        }
        debug!(%date, "selected date changed");
        self.selected_date = date;
        if self.poller.is_some() {
            self.mount();
        }
    }

    pub fn active_tab(&self) -> GuardTab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: GuardTab) {
        self.active_tab = tab;
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Vec<Visitor>>> {
        self.sync.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot<Vec<Visitor>> {
        self.sync.snapshot()
    }

    /// Fetch once without polling.
    pub async fn refresh(&self) -> bool {
        self.sync.refresh().await
    }

    pub fn view(&self) -> GuardView {
        GuardView::from_snapshot(&self.sync.snapshot(), self.selected_date, self.active_tab)
    }

    pub async fn check_in(&self, id: VisitorId) -> Result<(), DashboardError> {
        run_and_reconcile(&self.sync, "Check In", id, self.backend.check_in(id)).await
    }

    pub async fn check_out(&self, id: VisitorId) -> Result<(), DashboardError> {
        run_and_reconcile(&self.sync, "Check Out", id, self.backend.check_out(id)).await
    }
}

impl Drop for GuardDashboard {
    fn drop(&mut self) {
        self.unmount();
    }
}
