//! Domain models for recorded rent payments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::rent_entry::RentEntry;

/// Method recorded when a payment is created from the dashboard.
pub const MANUAL_PAYMENT_METHOD: &str = "manual";

/// Label shown in exports when a payment carries no method.
pub const DEFAULT_METHOD_LABEL: &str = "Manual";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub rent_entry_id: Uuid,
    pub payment_date: DateTime<Utc>,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn new(rent_entry_id: Uuid, payment_date: DateTime<Utc>, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            rent_entry_id,
            payment_date,
            amount,
            payment_method: None,
            notes: None,
            created_at: payment_date,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = non_empty(Some(method.into()));
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_empty(Some(notes.into()));
        self
    }

    /// Calendar day (UTC) on which the payment was made.
    pub fn payment_day(&self) -> NaiveDate {
        self.payment_date.date_naive()
    }

    pub fn method_label(&self) -> &str {
        self.payment_method.as_deref().unwrap_or(DEFAULT_METHOD_LABEL)
    }
}

impl Identifiable for PaymentRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for PaymentRecord {
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// A payment joined with the rent entry it settles, when that entry still exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentWithEntry {
    pub payment: PaymentRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent_entry: Option<RentEntry>,
}

impl PaymentWithEntry {
    pub fn new(payment: PaymentRecord, rent_entry: Option<RentEntry>) -> Self {
        Self {
            payment,
            rent_entry,
        }
    }

    /// Property label for history rows.
    pub fn property_label(&self) -> String {
        self.rent_entry
            .as_ref()
            .map(|entry| entry.display_label())
            .unwrap_or_else(|| DEFAULT_RENT_LABEL.to_string())
    }
}

impl Amounted for PaymentWithEntry {
    fn amount(&self) -> f64 {
        self.payment.amount
    }
}
