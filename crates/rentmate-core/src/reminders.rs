//! Works out which reminders are due for a user's unpaid rent entries.
//! Delivery is out of scope; callers decide what to do with the plan.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use rentmate_domain::{reminder_day_label, Displayable, RentEntry, UserSettings};

use crate::{
    dashboard::PaymentIndex,
    format::{format_currency, format_due_label},
    status::days_until,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderChannel {
    Email,
    Sms,
}

impl fmt::Display for ReminderChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderChannel::Email => f.write_str("email"),
            ReminderChannel::Sms => f.write_str("sms"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedReminder {
    pub rent_entry_id: Uuid,
    pub due_date: NaiveDate,
    pub days_before: u32,
    pub channels: Vec<ReminderChannel>,
    pub message: String,
}

pub struct ReminderPlanner;

impl ReminderPlanner {
    /// Channels enabled in `settings`; SMS only counts when a phone number is on file.
    pub fn channels(settings: &UserSettings) -> Vec<ReminderChannel> {
        let mut channels = Vec::new();
        if settings.email_reminder {
            channels.push(ReminderChannel::Email);
        }
        if settings.sms_reminder && settings.phone_number.is_some() {
            channels.push(ReminderChannel::Sms);
        }
        channels
    }

    /// Reminders for unpaid entries whose remaining days match a configured lead time.
    pub fn plan(
        entries: &[RentEntry],
        index: &PaymentIndex,
        settings: &UserSettings,
        now: DateTime<Utc>,
    ) -> Vec<PlannedReminder> {
        let channels = Self::channels(settings);
        if channels.is_empty() {
            return Vec::new();
        }
        let mut planned = Vec::new();
        for entry in entries.iter().filter(|entry| !index.is_paid(entry.id)) {
            let days = days_until(entry.due_date, now);
            if !settings.reminds_on(days) {
                continue;
            }
            let days_before = days as u32;
            planned.push(PlannedReminder {
                rent_entry_id: entry.id,
                due_date: entry.due_date,
                days_before,
                channels: channels.clone(),
                message: format!(
                    "{}: {} due {} ({})",
                    entry.display_label(),
                    format_currency(entry.amount),
                    format_due_label(entry.due_date),
                    reminder_day_label(days_before).to_lowercase()
                ),
            });
        }
        debug!(count = planned.len(), "planned rent reminders");
        planned
    }
}
