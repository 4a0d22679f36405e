//! Local notifications derived from consecutive visitor polls.

use std::collections::HashMap;

use super::{Notification, NotificationSource};
use crate::models::{Visitor, VisitorId, VisitorStatus};

/// Diffs each visitor's status against the previous poll.
///
/// Visitors are matched by id. The first observation only records a
/// baseline, and a status that stays put never notifies twice.
#[derive(Debug, Default)]
pub struct StatusWatcher {
    previous: Option<HashMap<VisitorId, VisitorStatus>>,
}

impl StatusWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, visitors: &[Visitor]) -> Vec<Notification> {
        let current: HashMap<VisitorId, VisitorStatus> =
            visitors.iter().map(|v| (v.id, v.status)).collect();

        let notes = match &self.previous {
            None => Vec::new(),
            Some(previous) => visitors
                .iter()
                .filter_map(|v| {
                    let before = previous.get(&v.id)?;
                    if *before == v.status {
                        return None;
                    }
                    transition_notice(v)
                })
                .collect(),
        };

        self.previous = Some(current);
        notes
    }
}

fn transition_notice(v: &Visitor) -> Option<Notification> {
    let (title, body) = match v.status {
        VisitorStatus::CheckedIn => ("Visitor Arrived", format!("'{}' has checked in.", v.name)),
        VisitorStatus::Approved => ("Visitor Approved", format!("'{}' has been approved.", v.name)),
        _ => return None,
    };
    Some(Notification::new(title, body, NotificationSource::StatusChange))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::visitor;

    const CREATED: &str = "2026-03-01T08:00:00Z";

    fn v(id: VisitorId, name: &str, status: VisitorStatus) -> Visitor {
        visitor(id, name, status, None, CREATED)
    }

    #[test]
    fn first_observation_is_baseline() {
        let mut w = StatusWatcher::new();
        assert!(w.observe(&[v(1, "Ramesh", VisitorStatus::CheckedIn)]).is_empty());
    }

    #[test]
    fn one_notice_per_transition() {
        let mut w = StatusWatcher::new();
        w.observe(&[v(1, "Ramesh", VisitorStatus::Approved)]);
        let notes = w.observe(&[v(1, "Ramesh", VisitorStatus::CheckedIn)]);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Visitor Arrived");
        assert_eq!(notes[0].body, "'Ramesh' has checked in.");
        assert_eq!(notes[0].source, NotificationSource::StatusChange);

        // Same status on the next tick: nothing.
        assert!(w.observe(&[v(1, "Ramesh", VisitorStatus::CheckedIn)]).is_empty());
    }

    #[test]
    fn approval_notice() {
        let mut w = StatusWatcher::new();
        w.observe(&[v(7, "Sita", VisitorStatus::Pending)]);
        let notes = w.observe(&[v(7, "Sita", VisitorStatus::Approved)]);
        assert_eq!(notes[0].title, "Visitor Approved");
        assert_eq!(notes[0].body, "'Sita' has been approved.");
    }

    #[test]
    fn matches_by_id_not_position_or_length() {
        let mut w = StatusWatcher::new();
        w.observe(&[
            v(1, "A", VisitorStatus::Pending),
            v(2, "B", VisitorStatus::Approved),
        ]);
        // Reordered, one new visitor, list length changed.
        let notes = w.observe(&[
            v(3, "C", VisitorStatus::CheckedIn),
            v(2, "B", VisitorStatus::CheckedIn),
            v(1, "A", VisitorStatus::Pending),
        ]);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].body, "'B' has checked in.");
    }

    #[test]
    fn other_transitions_are_silent() {
        let mut w = StatusWatcher::new();
        w.observe(&[v(1, "A", VisitorStatus::CheckedIn), v(2, "B", VisitorStatus::Pending)]);
        let notes = w.observe(&[v(1, "A", VisitorStatus::CheckedOut), v(2, "B", VisitorStatus::Denied)]);
        assert!(notes.is_empty());
    }
}
