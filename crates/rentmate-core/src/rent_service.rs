use tracing::{info, warn};
use uuid::Uuid;

use rentmate_domain::{RentEntry, Session, UserSettings};

use crate::{backend::RentBackend, time::Clock, validation::RentForm, CoreError};

/// Message shown when an entry cannot be loaded for editing.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load rent entry";

pub struct RentService;

impl RentService {
    pub fn list(backend: &dyn RentBackend, session: &Session) -> Result<Vec<RentEntry>, CoreError> {
        let mut entries = backend.list_rent_entries(session.user_id)?;
        entries.sort_by_key(|entry| entry.due_date);
        Ok(entries)
    }

    /// Validates and stores a new entry, then makes sure the user has a settings row.
    pub fn add(
        backend: &dyn RentBackend,
        clock: &dyn Clock,
        session: &Session,
        form: &RentForm,
    ) -> Result<RentEntry, CoreError> {
        let draft = form.validate()?;
        let entry = RentEntry::new(session.user_id, draft, clock.now());
        backend.insert_rent_entry(&entry)?;
        info!(rent_entry_id = %entry.id, amount = entry.amount, "rent entry added");
        if let Err(err) = Self::ensure_default_settings(backend, clock, session.user_id) {
            warn!(error = %err, "could not create default settings");
        }
        Ok(entry)
    }

    /// Inserts default settings when none exist. Existing settings are left untouched.
    pub fn ensure_default_settings(
        backend: &dyn RentBackend,
        clock: &dyn Clock,
        user_id: Uuid,
    ) -> Result<bool, CoreError> {
        if backend.user_settings(user_id)?.is_some() {
            return Ok(false);
        }
        backend.upsert_user_settings(&UserSettings::defaults_for(user_id, clock.now()))?;
        Ok(true)
    }

    pub fn load_for_edit(
        backend: &dyn RentBackend,
        session: &Session,
        id: Uuid,
    ) -> Result<RentEntry, CoreError> {
        match backend.rent_entry(session.user_id, id) {
            Ok(Some(entry)) => Ok(entry),
            Ok(None) => Err(CoreError::validation(LOAD_FAILED_MESSAGE)),
            Err(err) => {
                warn!(rent_entry_id = %id, error = %err, "loading rent entry failed");
                Err(CoreError::validation(LOAD_FAILED_MESSAGE))
            }
        }
    }

    pub fn update(
        backend: &dyn RentBackend,
        clock: &dyn Clock,
        session: &Session,
        id: Uuid,
        form: &RentForm,
    ) -> Result<RentEntry, CoreError> {
        let draft = form.validate()?;
        let mut entry = backend
            .rent_entry(session.user_id, id)?
            .ok_or(CoreError::RentEntryNotFound(id))?;
        Self::ensure_unreferenced(backend, session, id)?;
        entry.apply(draft, clock.now());
        backend.update_rent_entry(&entry)?;
        info!(rent_entry_id = %id, "rent entry updated");
        Ok(entry)
    }

    pub fn delete(backend: &dyn RentBackend, session: &Session, id: Uuid) -> Result<(), CoreError> {
        if backend.rent_entry(session.user_id, id)?.is_none() {
            return Err(CoreError::RentEntryNotFound(id));
        }
        Self::ensure_unreferenced(backend, session, id)?;
        backend.delete_rent_entry(session.user_id, id)?;
        info!(rent_entry_id = %id, "rent entry deleted");
        Ok(())
    }

    /// Entries with recorded payments are frozen.
    fn ensure_unreferenced(
        backend: &dyn RentBackend,
        session: &Session,
        id: Uuid,
    ) -> Result<(), CoreError> {
        let referenced = backend
            .list_payments(session.user_id)?
            .iter()
            .any(|row| row.payment.rent_entry_id == id);
        if referenced {
            return Err(CoreError::InvalidOperation(
                "rent entry already has payments recorded".into(),
            ));
        }
        Ok(())
    }
}
