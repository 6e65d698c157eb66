//! Dashboard assembly: rent cards with derived status plus recent payments.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use rentmate_domain::{PaymentRecord, PaymentWithEntry, RentEntry};

use crate::status::{StatusDeriver, StatusReport};

/// Number of payments shown under "Recent Payments".
pub const RECENT_PAYMENTS_LIMIT: usize = 3;

/// Latest payment instant per rent entry, built once per fetch cycle.
#[derive(Debug, Clone, Default)]
pub struct PaymentIndex {
    latest: HashMap<Uuid, DateTime<Utc>>,
}

impl PaymentIndex {
    pub fn build<'a>(payments: impl IntoIterator<Item = &'a PaymentRecord>) -> Self {
        let mut latest: HashMap<Uuid, DateTime<Utc>> = HashMap::new();
        for payment in payments {
            latest
                .entry(payment.rent_entry_id)
                .and_modify(|seen| {
                    if payment.payment_date > *seen {
                        *seen = payment.payment_date;
                    }
                })
                .or_insert(payment.payment_date);
        }
        Self { latest }
    }

    pub fn from_history(rows: &[PaymentWithEntry]) -> Self {
        Self::build(rows.iter().map(|row| &row.payment))
    }

    pub fn is_paid(&self, rent_entry_id: Uuid) -> bool {
        self.latest.contains_key(&rent_entry_id)
    }

    pub fn latest_payment(&self, rent_entry_id: Uuid) -> Option<DateTime<Utc>> {
        self.latest.get(&rent_entry_id).copied()
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardCard {
    pub entry: RentEntry,
    pub status: StatusReport,
    pub latest_payment: Option<DateTime<Utc>>,
}

impl DashboardCard {
    /// Unpaid cards offer edit and mark-as-paid actions.
    pub fn is_actionable(&self) -> bool {
        !self.status.is_paid()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub cards: Vec<DashboardCard>,
    pub recent_payments: Vec<PaymentWithEntry>,
    pub has_more_payments: bool,
}

impl DashboardView {
    /// Builds the view from both fetch results. Taking both lists by value means the
    /// paid lookup can never run against a payment set that has not loaded yet.
    pub fn build(
        mut entries: Vec<RentEntry>,
        payments: Vec<PaymentWithEntry>,
        now: DateTime<Utc>,
    ) -> Self {
        let index = PaymentIndex::from_history(&payments);
        entries.sort_by_key(|entry| entry.due_date);
        let cards = entries
            .into_iter()
            .map(|entry| {
                let is_paid = index.is_paid(entry.id);
                DashboardCard {
                    status: StatusDeriver::derive(entry.due_date, now, is_paid),
                    latest_payment: index.latest_payment(entry.id),
                    entry,
                }
            })
            .collect();
        let has_more_payments = payments.len() > RECENT_PAYMENTS_LIMIT;
        let recent_payments = payments.into_iter().take(RECENT_PAYMENTS_LIMIT).collect();
        Self {
            cards,
            recent_payments,
            has_more_payments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn unpaid(&self) -> impl Iterator<Item = &DashboardCard> {
        self.cards.iter().filter(|card| card.is_actionable())
    }
}
