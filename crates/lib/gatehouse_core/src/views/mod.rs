//! Role dashboards and the pure derivations behind them.
//!
//! Dashboards hold a [`Synchronizer`] per remote list and derive everything
//! they render from its latest snapshot. Commands never mutate local state:
//! each one is followed by an awaited re-fetch so the server's answer wins.

pub mod admin;
pub mod board;
pub mod chat;
pub mod format;
pub mod guard;
pub mod resident;

use std::future::Future;

use thiserror::Error;
use tracing::{info, warn};

use crate::api::ApiError;
use crate::models::{Visitor, VisitorId};
use crate::poll::Synchronizer;

pub use admin::{AdminDashboard, AdminTab, AuditLogView, UserDirectory};
pub use board::{DayBoard, GuardTab, TabCounts, VisitorAction};
pub use chat::ChatSession;
pub use guard::{GuardDashboard, GuardView};
pub use resident::ResidentDashboard;

/// Dashboard command failures.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{action} failed: {source}")]
    Command {
        action: &'static str,
        #[source]
        source: ApiError,
    },
}

/// Run a visitor command, then re-fetch regardless of its outcome.
///
/// A failure is surfaced on the synchronizer after the re-fetch so the
/// message survives until the next poll.
pub(crate) async fn run_and_reconcile<F>(
    sync: &Synchronizer<Vec<Visitor>>,
    action: &'static str,
    id: VisitorId,
    command: F,
) -> Result<(), DashboardError>
where
    F: Future<Output = Result<Visitor, ApiError>>,
{
    let result = command.await;
    sync.refresh().await;
    match result {
        Ok(visitor) => {
            info!(visitor_id = id, status = %visitor.status, "{action} succeeded");
            Ok(())
        }
        Err(source) => {
            let err = DashboardError::Command { action, source };
            warn!(visitor_id = id, "{err}");
            sync.report_error(err.to_string());
            Err(err)
        }
    }
}
