//! Date bucketing and status tabs over a visitor list.

use chrono::NaiveDate;

use crate::models::{Visitor, VisitorStatus};

/// Status tabs of the operations board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardTab {
    /// Approved, not yet arrived.
    Expected,
    Pending,
    /// Checked in, not yet left.
    Inside,
    /// Everything except pending.
    DailyLog,
}

impl GuardTab {
    pub const ALL: [GuardTab; 4] = [
        GuardTab::Expected,
        GuardTab::Pending,
        GuardTab::Inside,
        GuardTab::DailyLog,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GuardTab::Expected => "Expected",
            GuardTab::Pending => "Pending",
            GuardTab::Inside => "Inside",
            GuardTab::DailyLog => "Daily Log",
        }
    }

    pub fn includes(&self, status: VisitorStatus) -> bool {
        match self {
            GuardTab::Expected => status == VisitorStatus::Approved,
            GuardTab::Pending => status == VisitorStatus::Pending,
            GuardTab::Inside => status == VisitorStatus::CheckedIn,
            GuardTab::DailyLog => status != VisitorStatus::Pending,
        }
    }
}

/// Calendar day a visitor belongs to: scheduled time if set, else creation
/// time, both taken as UTC dates.
pub fn visit_date(visitor: &Visitor) -> NaiveDate {
    visitor
        .scheduled_time
        .unwrap_or(visitor.created_at)
        .date_naive()
}

/// Per-tab counts for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabCounts {
    pub expected: usize,
    pub pending: usize,
    pub inside: usize,
    pub daily_log: usize,
}

impl TabCounts {
    pub fn get(&self, tab: GuardTab) -> usize {
        match tab {
            GuardTab::Expected => self.expected,
            GuardTab::Pending => self.pending,
            GuardTab::Inside => self.inside,
            GuardTab::DailyLog => self.daily_log,
        }
    }
}

/// Visitors of a single day, partitioned by tab on demand.
#[derive(Debug, Clone)]
pub struct DayBoard<'a> {
    date: NaiveDate,
    visitors: Vec<&'a Visitor>,
}

impl<'a> DayBoard<'a> {
    pub fn build(visitors: &'a [Visitor], date: NaiveDate) -> Self {
        Self {
            date,
            visitors: visitors.iter().filter(|v| visit_date(v) == date).collect(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// All visitors of the day, in server order.
    pub fn visitors(&self) -> &[&'a Visitor] {
        &self.visitors
    }

    pub fn tab(&self, tab: GuardTab) -> Vec<&'a Visitor> {
        self.visitors
            .iter()
            .copied()
            .filter(|v| tab.includes(v.status))
            .collect()
    }

    /// Counts are the lengths of the tab lists, nothing else.
    pub fn counts(&self) -> TabCounts {
        TabCounts {
            expected: self.tab(GuardTab::Expected).len(),
            pending: self.tab(GuardTab::Pending).len(),
            inside: self.tab(GuardTab::Inside).len(),
            daily_log: self.tab(GuardTab::DailyLog).len(),
        }
    }
}

/// Command a guard can issue for a visitor row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorAction {
    CheckIn,
    CheckOut,
}

impl VisitorAction {
    pub fn label(&self) -> &'static str {
        match self {
            VisitorAction::CheckIn => "Check In",
            VisitorAction::CheckOut => "Check Out",
        }
    }
}

pub fn available_action(visitor: &Visitor) -> Option<VisitorAction> {
    match visitor.status {
        VisitorStatus::Approved => Some(VisitorAction::CheckIn),
        VisitorStatus::CheckedIn => Some(VisitorAction::CheckOut),
        VisitorStatus::Pending | VisitorStatus::Denied | VisitorStatus::CheckedOut => None,
    }
}
