//! Domain model for a single rent obligation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RentEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landlord_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landlord_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RentEntry {
    /// Builds a new entry owned by `user_id` from validated draft values.
    pub fn new(user_id: Uuid, draft: RentEntryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount: draft.amount,
            due_date: draft.due_date,
            landlord_name: draft.landlord_name,
            landlord_contact: draft.landlord_contact,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the editable fields and bumps `updated_at`.
    pub fn apply(&mut self, draft: RentEntryDraft, now: DateTime<Utc>) {
        self.amount = draft.amount;
        self.due_date = draft.due_date;
        self.landlord_name = draft.landlord_name;
        self.landlord_contact = draft.landlord_contact;
        self.notes = draft.notes;
        self.updated_at = now;
    }

    /// Returns the editable fields as a draft, e.g. to prefill an edit form.
    pub fn to_draft(&self) -> RentEntryDraft {
        RentEntryDraft {
            amount: self.amount,
            due_date: self.due_date,
            landlord_name: self.landlord_name.clone(),
            landlord_contact: self.landlord_contact.clone(),
            notes: self.notes.clone(),
        }
    }
}

impl Identifiable for RentEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl OwnedByUser for RentEntry {
    fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl Amounted for RentEntry {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for RentEntry {
    fn display_label(&self) -> String {
        self.landlord_name
            .clone()
            .unwrap_or_else(|| DEFAULT_RENT_LABEL.to_string())
    }
}

/// Editable fields of a [`RentEntry`] after form validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RentEntryDraft {
    pub amount: f64,
    pub due_date: NaiveDate,
    pub landlord_name: Option<String>,
    pub landlord_contact: Option<String>,
    pub notes: Option<String>,
}

impl RentEntryDraft {
    pub fn new(amount: f64, due_date: NaiveDate) -> Self {
        Self {
            amount,
            due_date,
            landlord_name: None,
            landlord_contact: None,
            notes: None,
        }
    }

    pub fn with_landlord(mut self, name: impl Into<String>) -> Self {
        self.landlord_name = non_empty(Some(name.into()));
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.landlord_contact = non_empty(Some(contact.into()));
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_empty(Some(notes.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn display_label_falls_back_to_monthly_rent() {
        let due = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let entry = RentEntry::new(Uuid::new_v4(), RentEntryDraft::new(1200.0, due), now());
        assert_eq!(entry.display_label(), "Monthly Rent");

        let named = RentEntry::new(
            Uuid::new_v4(),
            RentEntryDraft::new(1200.0, due).with_landlord("Jane Doe"),
            now(),
        );
        assert_eq!(named.display_label(), "Jane Doe");
    }

    #[test]
    fn apply_replaces_fields_and_touches_timestamp() {
        let due = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut entry = RentEntry::new(
            Uuid::new_v4(),
            RentEntryDraft::new(1200.0, due).with_notes("first"),
            now(),
        );
        let later = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();
        let new_due = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        entry.apply(RentEntryDraft::new(1250.0, new_due), later);

        assert_eq!(entry.amount, 1250.0);
        assert_eq!(entry.due_date, new_due);
        assert!(entry.notes.is_none());
        assert_eq!(entry.created_at, now());
        assert_eq!(entry.updated_at, later);
    }

    #[test]
    fn serializes_without_empty_optionals() {
        let due = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let entry = RentEntry::new(Uuid::new_v4(), RentEntryDraft::new(900.0, due), now());
        let json = serde_json::to_string(&entry).expect("serialize entry");
        assert!(!json.contains("landlord_name"));
        assert!(json.contains("\"due_date\":\"2024-03-15\""));
    }
}
