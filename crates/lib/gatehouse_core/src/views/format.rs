//! Display formatting for dashboard rows.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use crate::models::{AuditEvent, User, Visitor, VisitorStatus};

/// Placeholder for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Short local time (`HH:MM`), or `N/A`.
pub fn format_time(time: Option<DateTime<Utc>>) -> String {
    format_time_in(time, &Local)
}

pub fn format_time_in<Tz>(time: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match time {
        Some(t) => t.with_timezone(tz).format("%H:%M").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Time shown in the board's time column.
///
/// Checked-in visitors show their check-in time when known; everything else
/// falls back to the scheduled time.
pub fn display_time(visitor: &Visitor) -> String {
    display_time_in(visitor, &Local)
}

pub fn display_time_in<Tz>(visitor: &Visitor, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if visitor.status == VisitorStatus::CheckedIn
        && let Some(at) = visitor.checked_in_at
    {
        return format_time_in(Some(at), tz);
    }
    format_time_in(visitor.scheduled_time, tz)
}

/// Medium date with short time, e.g. `Oct 18, 2026, 9:41 AM`.
pub fn format_timestamp_in<Tz>(ts: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ts.with_timezone(tz).format("%b %-d, %Y, %-I:%M %p").to_string()
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    format_timestamp_in(ts, &Local)
}

/// Heading for a day's board, e.g. `October 18`.
pub fn date_heading(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

/// One rendered audit-log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRow {
    pub kind: String,
    pub timestamp: String,
    pub actor: String,
    pub subject: String,
    pub details: String,
}

impl AuditRow {
    pub fn from_event(event: &AuditEvent) -> Self {
        Self::from_event_in(event, &Local)
    }

    pub fn from_event_in<Tz>(event: &AuditEvent, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let details = match &event.payload {
            Some(payload) if !is_empty_payload(payload) => {
                serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
            }
            _ => "None".to_string(),
        };
        Self {
            kind: event.kind.replace('_', " "),
            timestamp: format_timestamp_in(event.timestamp, tz),
            actor: event
                .actor
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "System".to_string()),
            subject: event
                .subject_visitor
                .map(|id| id.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            details,
        }
    }
}

fn is_empty_payload(payload: &serde_json::Value) -> bool {
    match payload {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// One rendered user-directory line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub username: String,
    pub role: String,
    pub flat: String,
    pub contact: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        Self {
            username: user.username.clone(),
            role: user.role.to_string(),
            flat: non_empty(&user.household_flat_number)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            contact: non_empty(&user.email)
                .or_else(|| non_empty(&user.phone))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;
    use crate::api::fake::{user, visitor};
    use crate::models::Role;
    use crate::models::VisitorStatus::*;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn checked_in_prefers_check_in_time() {
        let mut v = visitor(1, "a", CheckedIn, Some("2026-10-18T03:00:00Z"), "2026-10-18T00:00:00Z");
        v.checked_in_at = Some(at("2026-10-18T04:15:00Z"));
        assert_eq!(display_time_in(&v, &ist()), "09:45");
    }

    #[test]
    fn checked_in_without_time_falls_back_to_scheduled() {
        let v = visitor(1, "a", CheckedIn, Some("2026-10-18T03:00:00Z"), "2026-10-18T00:00:00Z");
        assert_eq!(display_time_in(&v, &ist()), "08:30");
    }

    #[test]
    fn other_statuses_use_scheduled_time() {
        let mut v = visitor(1, "a", CheckedOut, Some("2026-10-18T03:00:00Z"), "2026-10-18T00:00:00Z");
        v.checked_in_at = Some(at("2026-10-18T04:15:00Z"));
        assert_eq!(display_time_in(&v, &Utc), "03:00");
    }

    #[test]
    fn missing_time_is_not_available() {
        let v = visitor(1, "a", Approved, None, "2026-10-18T00:00:00Z");
        assert_eq!(display_time_in(&v, &Utc), NOT_AVAILABLE);
    }

    #[test]
    fn timestamp_and_heading() {
        assert_eq!(
            format_timestamp_in(at("2026-10-18T14:05:00Z"), &Utc),
            "Oct 18, 2026, 2:05 PM"
        );
        assert_eq!(
            date_heading(NaiveDate::from_ymd_opt(2026, 10, 8).unwrap()),
            "October 8"
        );
    }

    #[test]
    fn audit_row_defaults() {
        let event = AuditEvent {
            id: 1,
            kind: "VISITOR_CHECKIN".into(),
            timestamp: at("2026-10-18T09:00:00Z"),
            actor: None,
            subject_visitor: None,
            payload: Some(serde_json::json!({})),
        };
        let row = AuditRow::from_event_in(&event, &Utc);
        assert_eq!(row.kind, "VISITOR CHECKIN");
        assert_eq!(row.actor, "System");
        assert_eq!(row.subject, "N/A");
        assert_eq!(row.details, "None");
    }

    #[test]
    fn audit_row_with_payload() {
        let event = AuditEvent {
            id: 2,
            kind: "ROLE_CHANGE".into(),
            timestamp: at("2026-10-18T09:00:00Z"),
            actor: Some("admin".into()),
            subject_visitor: Some(9),
            payload: Some(serde_json::json!({"to": "GUARD"})),
        };
        let row = AuditRow::from_event_in(&event, &Utc);
        assert_eq!(row.actor, "admin");
        assert_eq!(row.subject, "9");
        assert!(row.details.contains("\"to\": \"GUARD\""));
    }

    #[test]
    fn user_row_contact_fallbacks() {
        let mut u = user(1, "asha", Role::Resident);
        assert_eq!(UserRow::from(&u).contact, "N/A");
        u.phone = Some("555".into());
        assert_eq!(UserRow::from(&u).contact, "555");
        u.email = Some("asha@example.com".into());
        assert_eq!(UserRow::from(&u).contact, "asha@example.com");
        u.household_flat_number = Some("B-2".into());
        let row = UserRow::from(&u);
        assert_eq!(row.flat, "B-2");
        assert_eq!(row.role, "RESIDENT");
    }
}
