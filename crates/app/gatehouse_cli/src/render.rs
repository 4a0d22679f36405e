//! Plain-text rendering of sessions, boards and lists.

use std::fmt::Write as _;

use gatehouse_core::auth::Session;
use gatehouse_core::models::{ChatMessage, ChatSender, Visitor};
use gatehouse_core::notify::{Notification, NotificationSink};
use gatehouse_core::poll::Snapshot;
use gatehouse_core::router::Navigation;
use gatehouse_core::views::board::available_action;
use gatehouse_core::views::format::{AuditRow, NOT_AVAILABLE, UserRow, date_heading, display_time};
use gatehouse_core::views::resident::awaiting_approval;
use gatehouse_core::views::{GuardTab, GuardView};

pub fn session(session: &Session) -> String {
    match session {
        Session::Anonymous => "Not logged in".to_string(),
        Session::Authenticated { role, username } => match username {
            Some(name) => format!("Logged in as {name} ({role})"),
            None => format!("Logged in ({role})"),
        },
    }
}

pub fn navigation(nav: &Navigation) -> String {
    let mut out = format!("{} -> {}", nav.path, nav.page);
    if nav.layout.show_logout {
        out.push_str(" [logout]");
    }
    out
}

fn visitor_line(v: &Visitor) -> String {
    let action = available_action(v)
        .map(|a| format!("  [{}]", a.label()))
        .unwrap_or_default();
    format!(
        "  #{:<4} {:<20} Flat {:<8} {:<6} {}{}",
        v.id,
        v.name,
        v.flat_number().unwrap_or(NOT_AVAILABLE),
        display_time(v),
        v.status.label(),
        action
    )
}

pub fn board(view: &GuardView) -> String {
    let mut out = format!("Visitors for {}\n", date_heading(view.date));
    let tabs: Vec<String> = GuardTab::ALL
        .iter()
        .map(|&tab| {
            let label = format!("{} ({})", tab.label(), view.counts.get(tab));
            if tab == view.tab { format!("[{label}]") } else { label }
        })
        .collect();
    out.push_str(&tabs.join(" | "));
    out.push('\n');

    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {error}");
    }
    if view.loading {
        out.push_str("Loading visitors...\n");
    } else if view.visitors.is_empty() {
        out.push_str("No visitors in this list.\n");
    } else {
        for v in &view.visitors {
            out.push_str(&visitor_line(v));
            out.push('\n');
        }
    }
    out
}

pub fn resident(snapshot: &Snapshot<Vec<Visitor>>) -> String {
    let mut out = String::from("Your visitors\n");
    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "! {error}");
    }
    if snapshot.loading {
        out.push_str("Loading visitors...\n");
        return out;
    }
    if snapshot.data.is_empty() {
        out.push_str("No visitors yet.\n");
        return out;
    }
    for v in &snapshot.data {
        let _ = writeln!(out, "  #{:<4} {:<20} {:<6} {}", v.id, v.name, display_time(v), v.status.label());
    }
    let _ = writeln!(out, "Awaiting approval: {}", awaiting_approval(&snapshot.data).len());
    out
}

pub fn audit(rows: &[AuditRow]) -> String {
    if rows.is_empty() {
        return "No audit events.\n".to_string();
    }
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{} | {} | actor: {} | visitor: {}",
            row.timestamp, row.kind, row.actor, row.subject
        );
        for line in row.details.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    out
}

pub fn users(rows: &[UserRow]) -> String {
    if rows.is_empty() {
        return "No users.\n".to_string();
    }
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{:<16} {:<9} {:<8} {}",
            row.username, row.role, row.flat, row.contact
        );
    }
    out
}

pub fn chat_message(msg: &ChatMessage) -> String {
    let who = match msg.sender {
        ChatSender::User => "you",
        ChatSender::Bot => "bot",
    };
    format!("{who}> {}", msg.text)
}

pub fn notification(n: &Notification) -> String {
    format!("[New Notification]\nTitle: {}\nBody: {}", n.title, n.body)
}

/// Prints notifications to stdout.
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, n: Notification) {
        println!("{}", notification(&n));
    }
}
