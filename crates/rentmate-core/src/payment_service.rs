use tracing::info;
use uuid::Uuid;

use rentmate_domain::{PaymentRecord, PaymentWithEntry, Session, MANUAL_PAYMENT_METHOD};

use crate::{
    backend::RentBackend,
    dashboard::{DashboardView, PaymentIndex},
    history::{HistoryAggregator, HistoryFilter, HistorySummary},
    time::Clock,
    CoreError,
};

/// Note attached to payments recorded from the dashboard.
pub const MARK_PAID_NOTE: &str = "Marked as paid via dashboard";

pub struct PaymentService;

impl PaymentService {
    /// Records a full payment of the entry's amount at the current instant.
    pub fn mark_paid(
        backend: &dyn RentBackend,
        clock: &dyn Clock,
        session: &Session,
        rent_entry_id: Uuid,
    ) -> Result<PaymentRecord, CoreError> {
        let entry = backend
            .rent_entry(session.user_id, rent_entry_id)?
            .ok_or(CoreError::RentEntryNotFound(rent_entry_id))?;
        let index = PaymentIndex::from_history(&backend.list_payments(session.user_id)?);
        if index.is_paid(entry.id) {
            return Err(CoreError::InvalidOperation(
                "rent entry is already paid".into(),
            ));
        }
        let payment = PaymentRecord::new(entry.id, clock.now(), entry.amount)
            .with_method(MANUAL_PAYMENT_METHOD)
            .with_notes(MARK_PAID_NOTE);
        backend.insert_payment(session.user_id, &payment)?;
        info!(rent_entry_id = %entry.id, amount = payment.amount, "rent marked as paid");
        Ok(payment)
    }

    /// All payments for the user, most recent first.
    pub fn list(
        backend: &dyn RentBackend,
        session: &Session,
    ) -> Result<Vec<PaymentWithEntry>, CoreError> {
        let mut rows = backend.list_payments(session.user_id)?;
        rows.sort_by(|a, b| b.payment.payment_date.cmp(&a.payment.payment_date));
        Ok(rows)
    }

    pub fn history(
        backend: &dyn RentBackend,
        session: &Session,
        filter: &HistoryFilter,
    ) -> Result<HistorySummary, CoreError> {
        let rows = Self::list(backend, session)?;
        Ok(HistoryAggregator::filter(&rows, filter))
    }

    /// Fetches entries and payments and combines them only once both are available.
    pub fn dashboard(
        backend: &dyn RentBackend,
        clock: &dyn Clock,
        session: &Session,
    ) -> Result<DashboardView, CoreError> {
        let entries = backend.list_rent_entries(session.user_id)?;
        let payments = Self::list(backend, session)?;
        Ok(DashboardView::build(entries, payments, clock.now()))
    }
}
