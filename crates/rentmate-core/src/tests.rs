use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::{
    backend::RentBackend,
    context::{AuthContext, ThemeContext},
    history::{HistoryFilter, MonthFilter},
    time::FixedClock,
    AuthService, CoreError, PaymentService, RentService, RentStatus, SettingsService,
    LOAD_FAILED_MESSAGE, MARK_PAID_NOTE,
};
use rentmate_domain::{
    AuthProvider, Credentials, PaymentRecord, PaymentWithEntry, RentEntry, Session, UserSettings,
};

#[derive(Default)]
struct MemoryState {
    users: Vec<(String, String, Uuid)>,
    session: Option<Session>,
    entries: Vec<RentEntry>,
    payments: Vec<PaymentRecord>,
    settings: Vec<UserSettings>,
}

/// In-memory backend honouring the per-user scoping contract.
#[derive(Default)]
struct MemoryBackend {
    state: Mutex<MemoryState>,
    fail_settings: bool,
}

impl MemoryBackend {
    fn failing_settings() -> Self {
        Self {
            fail_settings: true,
            ..Self::default()
        }
    }

    fn settings_failure(&self) -> Result<(), CoreError> {
        if self.fail_settings {
            Err(CoreError::Backend("settings table unavailable".into()))
        } else {
            Ok(())
        }
    }
}

impl RentBackend for MemoryBackend {
    fn current_session(&self) -> Result<Option<Session>, CoreError> {
        Ok(self.state.lock().unwrap().session.clone())
    }

    fn sign_up(&self, credentials: &Credentials) -> Result<Session, CoreError> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|(email, _, _)| *email == credentials.email) {
            return Err(CoreError::Auth("User already registered".into()));
        }
        let id = Uuid::new_v4();
        state
            .users
            .push((credentials.email.clone(), credentials.password.clone(), id));
        let session = Session::new(id, credentials.email.clone(), now());
        state.session = Some(session.clone());
        Ok(session)
    }

    fn sign_in(&self, credentials: &Credentials) -> Result<Session, CoreError> {
        let mut state = self.state.lock().unwrap();
        let id = state
            .users
            .iter()
            .find(|(email, password, _)| {
                *email == credentials.email && *password == credentials.password
            })
            .map(|(_, _, id)| *id)
            .ok_or_else(|| CoreError::Auth("Invalid login credentials".into()))?;
        let session = Session::new(id, credentials.email.clone(), now());
        state.session = Some(session.clone());
        Ok(session)
    }

    fn sign_in_with_provider(&self, provider: AuthProvider) -> Result<(), CoreError> {
        Err(CoreError::Unsupported(format!("{provider} sign-in")))
    }

    fn sign_out(&self) -> Result<(), CoreError> {
        self.state.lock().unwrap().session = None;
        Ok(())
    }

    fn insert_rent_entry(&self, entry: &RentEntry) -> Result<(), CoreError> {
        self.state.lock().unwrap().entries.push(entry.clone());
        Ok(())
    }

    fn rent_entry(&self, user_id: Uuid, id: Uuid) -> Result<Option<RentEntry>, CoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .entries
            .iter()
            .find(|e| e.id == id && e.user_id == user_id)
            .cloned())
    }

    fn list_rent_entries(&self, user_id: Uuid) -> Result<Vec<RentEntry>, CoreError> {
        let state = self.state.lock().unwrap();
        let mut entries: Vec<RentEntry> = state
            .entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.due_date);
        Ok(entries)
    }

    fn update_rent_entry(&self, entry: &RentEntry) -> Result<(), CoreError> {
        let mut state = self.state.lock().unwrap();
        let slot = state
            .entries
            .iter_mut()
            .find(|e| e.id == entry.id && e.user_id == entry.user_id)
            .ok_or(CoreError::RentEntryNotFound(entry.id))?;
        *slot = entry.clone();
        Ok(())
    }

    fn delete_rent_entry(&self, user_id: Uuid, id: Uuid) -> Result<(), CoreError> {
        let mut state = self.state.lock().unwrap();
        state.entries.retain(|e| !(e.id == id && e.user_id == user_id));
        Ok(())
    }

    fn insert_payment(&self, user_id: Uuid, payment: &PaymentRecord) -> Result<(), CoreError> {
        let mut state = self.state.lock().unwrap();
        if !state
            .entries
            .iter()
            .any(|e| e.id == payment.rent_entry_id && e.user_id == user_id)
        {
            return Err(CoreError::RentEntryNotFound(payment.rent_entry_id));
        }
        state.payments.push(payment.clone());
        Ok(())
    }

    fn list_payments(&self, user_id: Uuid) -> Result<Vec<PaymentWithEntry>, CoreError> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<PaymentWithEntry> = state
            .payments
            .iter()
            .filter_map(|p| {
                let entry = state
                    .entries
                    .iter()
                    .find(|e| e.id == p.rent_entry_id && e.user_id == user_id)?;
                Some(PaymentWithEntry::new(p.clone(), Some(entry.clone())))
            })
            .collect();
        rows.sort_by(|a, b| b.payment.payment_date.cmp(&a.payment.payment_date));
        Ok(rows)
    }

    fn user_settings(&self, user_id: Uuid) -> Result<Option<UserSettings>, CoreError> {
        self.settings_failure()?;
        let state = self.state.lock().unwrap();
        Ok(state.settings.iter().find(|s| s.user_id == user_id).cloned())
    }

    fn upsert_user_settings(&self, settings: &UserSettings) -> Result<(), CoreError> {
        self.settings_failure()?;
        let mut state = self.state.lock().unwrap();
        state.settings.retain(|s| s.user_id != settings.user_id);
        state.settings.push(settings.clone());
        Ok(())
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
}

fn clock() -> FixedClock {
    FixedClock(now())
}

fn signed_in(backend: &MemoryBackend, email: &str) -> Session {
    let mut auth = AuthContext::default();
    AuthService::sign_up(backend, &mut auth, email, "secret1", "secret1").expect("sign up")
}

fn form(amount: &str, due: &str) -> crate::validation::RentForm {
    crate::validation::RentForm::new(amount, due)
}

#[test]
fn sign_up_validates_before_calling_backend() {
    let backend = MemoryBackend::default();
    let mut auth = AuthContext::default();
    let err = AuthService::sign_up(&backend, &mut auth, "a@b.co", "12345", "12345")
        .expect_err("short password");
    assert_eq!(err.to_string(), "Password must be at least 6 characters long");
    assert!(!auth.is_signed_in());
    assert!(backend.state.lock().unwrap().users.is_empty());

    AuthService::sign_up(&backend, &mut auth, "a@b.co", "123456", "123456").expect("sign up");
    assert!(auth.is_signed_in());
}

#[test]
fn sign_in_and_out_track_the_session() {
    let backend = MemoryBackend::default();
    signed_in(&backend, "tenant@example.com");
    let mut auth = AuthContext::default();
    AuthService::sign_out(&backend, &mut auth).expect("sign out");
    assert!(AuthService::restore(&backend).expect("restore").session().is_none());

    let err = AuthService::sign_in(&backend, &mut auth, "tenant@example.com", "wrong!")
        .expect_err("bad password");
    assert!(matches!(err, CoreError::Auth(_)));

    AuthService::sign_in(&backend, &mut auth, "tenant@example.com", "secret1").expect("sign in");
    assert_eq!(
        auth.session().map(|s| s.email.as_str()),
        Some("tenant@example.com")
    );
    assert!(AuthService::sign_in_with_provider(&backend, AuthProvider::Google).is_err());
}

#[test]
fn adding_rent_creates_default_settings_once() {
    let backend = MemoryBackend::default();
    let session = signed_in(&backend, "a@b.co");
    let entry = RentService::add(&backend, &clock(), &session, &form("1200", "2024-04-01"))
        .expect("add rent");
    assert_eq!(entry.user_id, session.user_id);

    let settings = backend
        .user_settings(session.user_id)
        .expect("settings")
        .expect("defaults created");
    assert_eq!(settings.reminder_days, vec![3, 1, 0]);

    let mut customised = settings.clone();
    customised.email_reminder = false;
    backend.upsert_user_settings(&customised).expect("upsert");
    RentService::add(&backend, &clock(), &session, &form("900", "2024-05-01")).expect("add");
    let stored = backend.user_settings(session.user_id).expect("settings");
    assert_eq!(stored.map(|s| s.email_reminder), Some(false));
}

#[test]
fn settings_failure_does_not_block_adding_rent() {
    let backend = MemoryBackend::failing_settings();
    let session = signed_in(&backend, "a@b.co");
    let entry = RentService::add(&backend, &clock(), &session, &form("1200", "2024-04-01"))
        .expect("entry still added");
    assert_eq!(
        RentService::list(&backend, &session).expect("list")[0].id,
        entry.id
    );
}

#[test]
fn invalid_rent_form_is_rejected() {
    let backend = MemoryBackend::default();
    let session = signed_in(&backend, "a@b.co");
    let err = RentService::add(&backend, &clock(), &session, &form("", "2024-04-01"))
        .expect_err("amount required");
    assert_eq!(err.to_string(), "Amount and due date are required");
    assert!(backend.state.lock().unwrap().entries.is_empty());
}

#[test]
fn rows_of_other_users_are_invisible() {
    let backend = MemoryBackend::default();
    let owner = signed_in(&backend, "owner@example.com");
    let entry = RentService::add(&backend, &clock(), &owner, &form("1000", "2024-04-01"))
        .expect("add");
    let intruder = signed_in(&backend, "intruder@example.com");

    let err = RentService::load_for_edit(&backend, &intruder, entry.id).expect_err("hidden");
    assert_eq!(err.to_string(), LOAD_FAILED_MESSAGE);
    assert!(RentService::list(&backend, &intruder).expect("list").is_empty());
    assert!(PaymentService::mark_paid(&backend, &clock(), &intruder, entry.id).is_err());
}

#[test]
fn mark_paid_records_manual_payment_and_refuses_repeat() {
    let backend = MemoryBackend::default();
    let session = signed_in(&backend, "a@b.co");
    let entry = RentService::add(&backend, &clock(), &session, &form("1500", "2024-03-12"))
        .expect("add");

    let payment = PaymentService::mark_paid(&backend, &clock(), &session, entry.id).expect("pay");
    assert_eq!(payment.amount, 1500.0);
    assert_eq!(payment.payment_method.as_deref(), Some("manual"));
    assert_eq!(payment.notes.as_deref(), Some(MARK_PAID_NOTE));
    assert_eq!(payment.payment_date, now());

    let err = PaymentService::mark_paid(&backend, &clock(), &session, entry.id)
        .expect_err("already paid");
    assert!(matches!(err, CoreError::InvalidOperation(_)));

    let view = PaymentService::dashboard(&backend, &clock(), &session).expect("dashboard");
    assert_eq!(view.cards[0].status.status, RentStatus::Paid);
    assert_eq!(view.recent_payments.len(), 1);
}

#[test]
fn paid_entries_cannot_be_edited_or_deleted() {
    let backend = MemoryBackend::default();
    let session = signed_in(&backend, "a@b.co");
    let entry = RentService::add(&backend, &clock(), &session, &form("1500", "2024-03-12"))
        .expect("add");
    let updated = RentService::update(
        &backend,
        &clock(),
        &session,
        entry.id,
        &form("1600", "2024-03-15"),
    )
    .expect("unpaid entry is editable");
    assert_eq!(updated.amount, 1600.0);

    PaymentService::mark_paid(&backend, &clock(), &session, entry.id).expect("pay");
    assert!(RentService::update(&backend, &clock(), &session, entry.id, &form("1", "2024-03-15"))
        .is_err());
    assert!(RentService::delete(&backend, &session, entry.id).is_err());
    assert_eq!(RentService::list(&backend, &session).expect("list").len(), 1);
}

#[test]
fn delete_removes_unpaid_entry() {
    let backend = MemoryBackend::default();
    let session = signed_in(&backend, "a@b.co");
    let entry = RentService::add(&backend, &clock(), &session, &form("700", "2024-03-20"))
        .expect("add");
    RentService::delete(&backend, &session, entry.id).expect("delete");
    assert!(RentService::list(&backend, &session).expect("list").is_empty());
    assert!(matches!(
        RentService::delete(&backend, &session, entry.id),
        Err(CoreError::RentEntryNotFound(_))
    ));
}

#[test]
fn history_filters_by_month_and_year() {
    let backend = MemoryBackend::default();
    let session = signed_in(&backend, "a@b.co");
    let entry = RentService::add(&backend, &clock(), &session, &form("1000", "2024-03-01"))
        .expect("add");
    PaymentService::mark_paid(&backend, &clock(), &session, entry.id).expect("pay");

    let march = HistoryFilter::new(MonthFilter::month(3).unwrap(), 2024);
    let summary = PaymentService::history(&backend, &session, &march).expect("history");
    assert_eq!(summary.count(), 1);
    assert_eq!(summary.total, 1000.0);

    let april = HistoryFilter::new(MonthFilter::month(4).unwrap(), 2024);
    assert!(PaymentService::history(&backend, &session, &april)
        .expect("history")
        .is_empty());
    let last_year = HistoryFilter::whole_year(2023);
    assert!(PaymentService::history(&backend, &session, &last_year)
        .expect("history")
        .is_empty());
}

#[test]
fn settings_load_defaults_and_save_validates_phone() {
    let backend = MemoryBackend::default();
    let session = signed_in(&backend, "a@b.co");
    let mut settings = SettingsService::load(&backend, &clock(), &session).expect("load");
    assert!(settings.email_reminder);
    assert!(!settings.sms_reminder);

    settings.sms_reminder = true;
    settings.phone_number = Some("555-1234".into());
    let err = SettingsService::save(&backend, &clock(), &session, settings.clone())
        .expect_err("bad phone");
    assert_eq!(
        err.to_string(),
        "Please enter a valid phone number for SMS reminders"
    );

    settings.phone_number = Some("+15551234567".into());
    assert!(SettingsService::toggle_reminder_day(&mut settings, 2).expect("toggle"));
    assert!(SettingsService::toggle_reminder_day(&mut settings, 7).is_err());
    let saved = SettingsService::save(&backend, &clock(), &session, settings).expect("save");
    assert_eq!(saved.reminder_days, vec![3, 2, 1, 0]);
    assert_eq!(
        backend.user_settings(session.user_id).expect("read"),
        Some(saved)
    );
}

#[test]
fn toggling_theme_persists_to_account_best_effort() {
    let backend = MemoryBackend::default();
    let session = signed_in(&backend, "a@b.co");
    let mut theme = ThemeContext::initialize(None, || false);
    assert!(SettingsService::toggle_dark_mode(&backend, &clock(), Some(&session), &mut theme));
    let stored = backend.user_settings(session.user_id).expect("read");
    assert_eq!(stored.map(|s| s.dark_mode), Some(true));

    let failing = MemoryBackend::failing_settings();
    let other = signed_in(&failing, "b@c.co");
    assert!(!SettingsService::toggle_dark_mode(&failing, &clock(), Some(&other), &mut theme));
    assert!(!theme.dark_mode());
}

#[test]
fn due_dates_round_trip_through_entries() {
    let backend = MemoryBackend::default();
    let session = signed_in(&backend, "a@b.co");
    let entry = RentService::add(&backend, &clock(), &session, &form("10", "2024-02-29"))
        .expect("add");
    let loaded = RentService::load_for_edit(&backend, &session, entry.id).expect("load");
    assert_eq!(loaded.due_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
}
