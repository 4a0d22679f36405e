//! Audit events. Append-only on the server, read-only here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: i64,
    /// Event type, e.g. `VISITOR_CHECKIN`.
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Utc>,
    /// Username of the acting user; `None` for system actions.
    #[serde(default)]
    pub actor: Option<String>,
    /// Visitor the event refers to, if any.
    #[serde(default)]
    pub subject_visitor: Option<i64>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}
