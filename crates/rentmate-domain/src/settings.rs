//! Per-user reminder and appearance preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::OwnedByUser;

/// Reminder lead times offered to users, in days before the due date.
pub const REMINDER_DAY_CHOICES: [u32; 4] = [3, 2, 1, 0];

/// Lead times applied when a user has never saved settings.
pub const DEFAULT_REMINDER_DAYS: [u32; 3] = [3, 1, 0];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSettings {
    pub user_id: Uuid,
    pub email_reminder: bool,
    pub sms_reminder: bool,
    #[serde(default = "UserSettings::default_reminder_days")]
    pub reminder_days: Vec<u32>,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSettings {
    /// Default settings for a user that has never saved any.
    pub fn defaults_for(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            email_reminder: true,
            sms_reminder: false,
            reminder_days: Self::default_reminder_days(),
            dark_mode: false,
            phone_number: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn default_reminder_days() -> Vec<u32> {
        DEFAULT_REMINDER_DAYS.to_vec()
    }

    /// Adds `day` when absent or removes it when present, keeping days sorted descending.
    /// Returns whether the day is now enabled.
    pub fn toggle_reminder_day(&mut self, day: u32) -> bool {
        if let Some(pos) = self.reminder_days.iter().position(|d| *d == day) {
            self.reminder_days.remove(pos);
            false
        } else {
            self.reminder_days.push(day);
            self.normalize_reminder_days();
            true
        }
    }

    pub fn normalize_reminder_days(&mut self) {
        self.reminder_days.sort_unstable_by(|a, b| b.cmp(a));
        self.reminder_days.dedup();
    }

    pub fn reminds_on(&self, days_before: i64) -> bool {
        u32::try_from(days_before)
            .map(|day| self.reminder_days.contains(&day))
            .unwrap_or(false)
    }
}

impl OwnedByUser for UserSettings {
    fn user_id(&self) -> Uuid {
        self.user_id
    }
}

/// Human label for a reminder lead time.
pub fn reminder_day_label(day: u32) -> String {
    match day {
        0 => "On due date".to_string(),
        1 => "1 day before".to_string(),
        n => format!("{n} days before"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn settings() -> UserSettings {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        UserSettings::defaults_for(Uuid::new_v4(), now)
    }

    #[test]
    fn defaults_match_new_user_expectations() {
        let s = settings();
        assert!(s.email_reminder);
        assert!(!s.sms_reminder);
        assert!(!s.dark_mode);
        assert_eq!(s.reminder_days, vec![3, 1, 0]);
        assert!(s.phone_number.is_none());
    }

    #[test]
    fn toggling_keeps_days_sorted_descending() {
        let mut s = settings();
        assert!(s.toggle_reminder_day(2));
        assert_eq!(s.reminder_days, vec![3, 2, 1, 0]);
        assert!(!s.toggle_reminder_day(3));
        assert_eq!(s.reminder_days, vec![2, 1, 0]);
    }

    #[test]
    fn labels_cover_singular_and_plural() {
        assert_eq!(reminder_day_label(0), "On due date");
        assert_eq!(reminder_day_label(1), "1 day before");
        assert_eq!(reminder_day_label(3), "3 days before");
    }

    #[test]
    fn reminds_on_ignores_negative_offsets() {
        let s = settings();
        assert!(s.reminds_on(0));
        assert!(!s.reminds_on(-1));
        assert!(!s.reminds_on(2));
    }
}
