use std::fs;

use chrono::{NaiveDate, TimeZone, Utc};
use tempfile::tempdir;

use rentmate_core::{
    AuthContext, AuthService, CoreError, FixedClock, PaymentService, RentBackend, RentService,
};
use rentmate_core::validation::RentForm;
use rentmate_domain::{AuthProvider, Credentials, RentEntry, RentEntryDraft, UserSettings};
use rentmate_storage_json::{JsonRentStore, STATE_FILE, STORE_FILE};

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap())
}

#[test]
fn sign_up_persists_hashed_credentials_and_session() {
    let dir = tempdir().expect("tempdir");
    let store = JsonRentStore::open(dir.path()).expect("open store");
    let session = store
        .sign_up(&Credentials::new("Tenant@Example.com", "secret1"))
        .expect("sign up");
    assert_eq!(session.email, "tenant@example.com");

    let raw = fs::read_to_string(dir.path().join(STORE_FILE)).expect("store file");
    assert!(!raw.contains("secret1"));
    assert!(dir.path().join(STATE_FILE).exists());

    let reopened = JsonRentStore::open(dir.path()).expect("reopen");
    assert_eq!(
        reopened.current_session().expect("session").map(|s| s.user_id),
        Some(session.user_id)
    );
    assert!(matches!(
        reopened.sign_up(&Credentials::new("tenant@example.com", "other1")),
        Err(CoreError::Auth(_))
    ));
}

#[test]
fn sign_in_checks_password_and_sign_out_clears_state() {
    let dir = tempdir().expect("tempdir");
    let store = JsonRentStore::open(dir.path()).expect("open store");
    store
        .sign_up(&Credentials::new("a@b.co", "secret1"))
        .expect("sign up");
    store.sign_out().expect("sign out");
    assert!(store.current_session().expect("session").is_none());

    let err = store
        .sign_in(&Credentials::new("a@b.co", "nope!!"))
        .expect_err("wrong password");
    assert_eq!(err.to_string(), "Authentication failed: Invalid login credentials");
    store
        .sign_in(&Credentials::new("a@b.co", "secret1"))
        .expect("sign in");
    assert!(matches!(
        store.sign_in_with_provider(AuthProvider::Google),
        Err(CoreError::Unsupported(_))
    ));
}

#[test]
fn rows_survive_reopen_and_stay_user_scoped() {
    let dir = tempdir().expect("tempdir");
    let store = JsonRentStore::open(dir.path()).expect("open store");
    let mut auth = AuthContext::default();
    let owner = AuthService::sign_up(&store, &mut auth, "owner@x.io", "secret1", "secret1")
        .expect("owner");
    let entry = RentService::add(
        &store,
        &clock(),
        &owner,
        &RentForm::new("1250.50", "2024-03-12"),
    )
    .expect("add");
    PaymentService::mark_paid(&store, &clock(), &owner, entry.id).expect("pay");

    let intruder = AuthService::sign_up(&store, &mut auth, "other@x.io", "secret1", "secret1")
        .expect("intruder");
    assert!(store.list_rent_entries(intruder.user_id).expect("list").is_empty());
    assert!(store.list_payments(intruder.user_id).expect("list").is_empty());
    assert!(store.rent_entry(intruder.user_id, entry.id).expect("get").is_none());
    assert!(store.delete_rent_entry(intruder.user_id, entry.id).is_err());

    let reopened = JsonRentStore::open(dir.path()).expect("reopen");
    let rows = reopened.list_payments(owner.user_id).expect("payments");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].payment.amount, 1250.5);
    assert_eq!(
        rows[0].rent_entry.as_ref().map(|e| e.id),
        Some(entry.id)
    );
    assert!(reopened.user_settings(owner.user_id).expect("settings").is_some());
}

#[test]
fn entries_list_by_due_date_and_delete_refuses_paid_rows() {
    let dir = tempdir().expect("tempdir");
    let store = JsonRentStore::open(dir.path()).expect("open store");
    let session = store
        .sign_up(&Credentials::new("a@b.co", "secret1"))
        .expect("sign up");
    let now = clock().0;
    let later = RentEntry::new(
        session.user_id,
        RentEntryDraft::new(900.0, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
        now,
    );
    let sooner = RentEntry::new(
        session.user_id,
        RentEntryDraft::new(900.0, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
        now,
    );
    store.insert_rent_entry(&later).expect("insert");
    store.insert_rent_entry(&sooner).expect("insert");
    let listed = store.list_rent_entries(session.user_id).expect("list");
    assert_eq!(listed[0].id, sooner.id);

    PaymentService::mark_paid(&store, &clock(), &session, sooner.id).expect("pay");
    assert!(matches!(
        store.delete_rent_entry(session.user_id, sooner.id),
        Err(CoreError::InvalidOperation(_))
    ));
    store
        .delete_rent_entry(session.user_id, later.id)
        .expect("delete unpaid");
    assert_eq!(store.list_rent_entries(session.user_id).expect("list").len(), 1);
}

#[test]
fn upsert_keeps_single_settings_row() {
    let dir = tempdir().expect("tempdir");
    let store = JsonRentStore::open(dir.path()).expect("open store");
    let session = store
        .sign_up(&Credentials::new("a@b.co", "secret1"))
        .expect("sign up");
    let mut settings = UserSettings::defaults_for(session.user_id, clock().0);
    store.upsert_user_settings(&settings).expect("insert");
    settings.dark_mode = true;
    settings.created_at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    store.upsert_user_settings(&settings).expect("update");

    let stored = store
        .user_settings(session.user_id)
        .expect("read")
        .expect("present");
    assert!(stored.dark_mode);
    assert_eq!(stored.created_at, clock().0);
}

#[test]
fn corrupt_store_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(STORE_FILE), "{not json").expect("write");
    assert!(matches!(
        JsonRentStore::open(dir.path()),
        Err(CoreError::Serde(_))
    ));
}

#[test]
fn account_and_session_timestamps_come_from_the_store_clock() {
    let dir = tempdir().expect("tempdir");
    let store = JsonRentStore::open(dir.path())
        .expect("open store")
        .with_clock(clock());
    let session = store
        .sign_up(&Credentials::new("a@b.co", "secret1"))
        .expect("sign up");
    assert_eq!(session.signed_in_at, clock().0);

    let users = store.users().expect("users");
    assert_eq!(users[0].created_at, clock().0);
    assert_ne!(users[0].password_hash.len(), 0);

    store.sign_out().expect("sign out");
    let later = FixedClock(clock().0 + chrono::Duration::hours(5));
    let store = JsonRentStore::open(dir.path())
        .expect("reopen")
        .with_clock(later);
    let session = store
        .sign_in(&Credentials::new("a@b.co", "secret1"))
        .expect("sign in");
    assert_eq!(session.signed_in_at, later.0);
}
