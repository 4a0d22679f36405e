//! Visitor records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend primary key of a visitor.
pub type VisitorId = i64;

/// Lifecycle status of a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitorStatus {
    Pending,
    Approved,
    Denied,
    CheckedIn,
    CheckedOut,
}

impl VisitorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorStatus::Pending => "PENDING",
            VisitorStatus::Approved => "APPROVED",
            VisitorStatus::Denied => "DENIED",
            VisitorStatus::CheckedIn => "CHECKED_IN",
            VisitorStatus::CheckedOut => "CHECKED_OUT",
        }
    }

    /// Human-readable label (`CHECKED_IN` → `CHECKED IN`).
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for VisitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Household hosting a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub id: i64,
    pub flat_number: String,
    #[serde(default)]
    pub name: String,
}

/// A guest's approval/arrival/departure record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visitor {
    pub id: VisitorId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub purpose: String,
    pub status: VisitorStatus,
    #[serde(default)]
    pub host_household: Option<Household>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub checked_out_at: Option<DateTime<Utc>>,
}

impl Visitor {
    /// Flat number of the hosting household, if known.
    pub fn flat_number(&self) -> Option<&str> {
        self.host_household
            .as_ref()
            .map(|h| h.flat_number.as_str())
            .filter(|f| !f.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_payload() {
        let json = r#"{
            "id": 7,
            "name": "Ramesh",
            "phone": "",
            "purpose": "Delivery",
            "status": "CHECKED_IN",
            "host_household": {"id": 1, "flat_number": "A-101", "name": "The Patels"},
            "scheduled_time": "2026-10-18T09:30:00Z",
            "created_at": "2026-10-17T18:00:00+05:30",
            "checked_in_at": "2026-10-18T09:41:00Z",
            "checked_out_at": null
        }"#;
        let v: Visitor = serde_json::from_str(json).unwrap();
        assert_eq!(v.status, VisitorStatus::CheckedIn);
        assert_eq!(v.flat_number(), Some("A-101"));
        assert!(v.approved_at.is_none());
        assert_eq!(v.created_at.to_rfc3339(), "2026-10-17T12:30:00+00:00");
    }

    #[test]
    fn status_label_replaces_underscores() {
        assert_eq!(VisitorStatus::CheckedOut.label(), "CHECKED OUT");
        assert_eq!(VisitorStatus::Pending.label(), "PENDING");
    }

    #[test]
    fn missing_household_has_no_flat() {
        let json = r#"{"id": 1, "name": "X", "status": "PENDING", "created_at": "2026-10-18T00:00:00Z"}"#;
        let v: Visitor = serde_json::from_str(json).unwrap();
        assert_eq!(v.flat_number(), None);
    }
}
