//! Derived display status of a rent entry.
//!
//! Status is a pure function of the due date, the current instant, and whether any
//! payment references the entry. Precedence: paid, overdue, due soon, upcoming.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Entries due within this many days (inclusive) are flagged as due soon.
pub const DUE_SOON_WINDOW_DAYS: i64 = 3;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RentStatus {
    Paid,
    Overdue,
    DueSoon,
    Upcoming,
}

impl RentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RentStatus::Paid => "paid",
            RentStatus::Overdue => "overdue",
            RentStatus::DueSoon => "duesoon",
            RentStatus::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for RentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status together with the signed day count it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub status: RentStatus,
    /// Days until the due date; negative once overdue.
    pub days_remaining: i64,
}

impl StatusReport {
    pub fn label(&self) -> String {
        match self.status {
            RentStatus::Paid => "Paid".to_string(),
            RentStatus::Overdue => {
                let days = self.days_remaining.abs();
                format!("Overdue by {} day{}", days, plural_suffix(days))
            }
            RentStatus::DueSoon => format!(
                "Due in {} day{}",
                self.days_remaining,
                plural_suffix(self.days_remaining)
            ),
            RentStatus::Upcoming => format!("Due in {} days", self.days_remaining),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == RentStatus::Paid
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn plural_suffix(count: i64) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Computes [`StatusReport`]s for rent entries.
pub struct StatusDeriver;

impl StatusDeriver {
    /// Derives the status against the current instant.
    pub fn derive(due_date: NaiveDate, now: DateTime<Utc>, is_paid: bool) -> StatusReport {
        Self::classify(days_until(due_date, now), is_paid)
    }

    /// Derives the status when only the calendar day is known.
    pub fn derive_on(due_date: NaiveDate, today: NaiveDate, is_paid: bool) -> StatusReport {
        Self::classify((due_date - today).num_days(), is_paid)
    }

    fn classify(days_remaining: i64, is_paid: bool) -> StatusReport {
        let status = if is_paid {
            RentStatus::Paid
        } else if days_remaining < 0 {
            RentStatus::Overdue
        } else if days_remaining <= DUE_SOON_WINDOW_DAYS {
            RentStatus::DueSoon
        } else {
            RentStatus::Upcoming
        };
        StatusReport {
            status,
            days_remaining,
        }
    }
}

/// Whole days from `now` until the start of `due_date` (UTC), rounded up.
///
/// A due date earlier today therefore yields 0 rather than -1.
pub fn days_until(due_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let due = due_date.and_time(NaiveTime::MIN).and_utc();
    let diff_ms = due.timestamp_millis() - now.timestamp_millis();
    -(-diff_ms).div_euclid(MILLIS_PER_DAY)
}
