//! Filesystem JSON implementation of the rent backend.
//!
//! Everything except the session lives in `store.json`; the signed-in session is kept
//! apart in `state.json` so signing in and out never rewrites user data.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use rentmate_core::{Clock, CoreError, RentBackend, SystemClock};
use rentmate_domain::{
    AuthProvider, Credentials, PaymentRecord, PaymentWithEntry, RentEntry, Session, UserSettings,
};

pub const STORE_FILE: &str = "store.json";
pub const STATE_FILE: &str = "state.json";
const TMP_SUFFIX: &str = "tmp";

/// SHA-256 iterations applied when hashing a new password.
pub const HASH_ROUNDS: u32 = 10_000;

const INVALID_CREDENTIALS: &str = "Invalid login credentials";
const ALREADY_REGISTERED: &str = "User already registered";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredUser {
    pub id: Uuid,
    pub email: String,
    pub salt: String,
    #[serde(default = "default_hash_rounds")]
    pub hash_rounds: u32,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    fn new(credentials: &Credentials, now: DateTime<Utc>) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(&credentials.email),
            password_hash: hash_password(&salt, &credentials.password, HASH_ROUNDS),
            hash_rounds: HASH_ROUNDS,
            salt,
            created_at: now,
        }
    }

    fn verify(&self, password: &str) -> bool {
        let candidate = hash_password(&self.salt, password, self.hash_rounds);
        constant_time_eq(candidate.as_bytes(), self.password_hash.as_bytes())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    users: Vec<StoredUser>,
    #[serde(default)]
    rent_entries: Vec<RentEntry>,
    #[serde(default)]
    payments: Vec<PaymentRecord>,
    #[serde(default)]
    settings: Vec<UserSettings>,
}

impl StoreFile {
    fn owns_entry(&self, user_id: Uuid, id: Uuid) -> bool {
        self.rent_entries
            .iter()
            .any(|entry| entry.id == id && entry.user_id == user_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    session: Option<Session>,
}

/// Local stand-in for the hosted backend, rooted at a single data directory.
pub struct JsonRentStore {
    root: PathBuf,
    store: Mutex<StoreFile>,
    state: Mutex<StateFile>,
    clock: Box<dyn Clock>,
}

impl JsonRentStore {
    /// Opens the store under `root`, creating the directory when missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let store: StoreFile = read_json_or_default(&root.join(STORE_FILE))?;
        let state: StateFile = read_json_or_default(&root.join(STATE_FILE))?;
        debug!(
            path = %root.display(),
            users = store.users.len(),
            entries = store.rent_entries.len(),
            "opened rent store"
        );
        Ok(Self {
            root,
            store: Mutex::new(store),
            state: Mutex::new(state),
            clock: Box::new(SystemClock),
        })
    }

    /// Replaces the clock used for account and session timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store_path(&self) -> PathBuf {
        self.root.join(STORE_FILE)
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    /// Registered user rows; exposed for inspection tooling and tests.
    pub fn users(&self) -> Result<Vec<StoredUser>, CoreError> {
        Ok(self.lock_store()?.users.clone())
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, StoreFile>, CoreError> {
        self.store
            .lock()
            .map_err(|_| CoreError::Backend("rent store lock poisoned".into()))
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, StateFile>, CoreError> {
        self.state
            .lock()
            .map_err(|_| CoreError::Backend("session state lock poisoned".into()))
    }

    /// Applies `change` to the store and persists it. The in-memory copy is only
    /// replaced once the file write succeeds.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut StoreFile) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut guard = self.lock_store()?;
        let mut next = guard.clone();
        let value = change(&mut next)?;
        save_json(&self.store_path(), &next)?;
        *guard = next;
        Ok(value)
    }

    fn start_session(&self, user: &StoredUser) -> Result<Session, CoreError> {
        let session = Session::new(user.id, user.email.clone(), self.clock.now());
        let mut state = self.lock_state()?;
        let next = StateFile {
            session: Some(session.clone()),
        };
        save_json(&self.state_path(), &next)?;
        *state = next;
        Ok(session)
    }
}

impl RentBackend for JsonRentStore {
    fn current_session(&self) -> Result<Option<Session>, CoreError> {
        Ok(self.lock_state()?.session.clone())
    }

    fn sign_up(&self, credentials: &Credentials) -> Result<Session, CoreError> {
        let email = normalize_email(&credentials.email);
        let user = self.mutate(|store| {
            if store.users.iter().any(|user| user.email == email) {
                return Err(CoreError::Auth(ALREADY_REGISTERED.into()));
            }
            let user = StoredUser::new(credentials, self.clock.now());
            store.users.push(user.clone());
            Ok(user)
        })?;
        info!(user_id = %user.id, "registered user");
        self.start_session(&user)
    }

    fn sign_in(&self, credentials: &Credentials) -> Result<Session, CoreError> {
        let email = normalize_email(&credentials.email);
        let user = self
            .lock_store()?
            .users
            .iter()
            .find(|user| user.email == email)
            .filter(|user| user.verify(&credentials.password))
            .cloned()
            .ok_or_else(|| CoreError::Auth(INVALID_CREDENTIALS.into()))?;
        self.start_session(&user)
    }

    fn sign_in_with_provider(&self, provider: AuthProvider) -> Result<(), CoreError> {
        Err(CoreError::Unsupported(format!(
            "{provider} sign-in is not available for local stores"
        )))
    }

    fn sign_out(&self) -> Result<(), CoreError> {
        let mut state = self.lock_state()?;
        let next = StateFile::default();
        save_json(&self.state_path(), &next)?;
        *state = next;
        Ok(())
    }

    fn insert_rent_entry(&self, entry: &RentEntry) -> Result<(), CoreError> {
        self.mutate(|store| {
            if store.rent_entries.iter().any(|existing| existing.id == entry.id) {
                return Err(CoreError::InvalidOperation(format!(
                    "rent entry {} already exists",
                    entry.id
                )));
            }
            store.rent_entries.push(entry.clone());
            Ok(())
        })
    }

    fn rent_entry(&self, user_id: Uuid, id: Uuid) -> Result<Option<RentEntry>, CoreError> {
        Ok(self
            .lock_store()?
            .rent_entries
            .iter()
            .find(|entry| entry.id == id && entry.user_id == user_id)
            .cloned())
    }

    fn list_rent_entries(&self, user_id: Uuid) -> Result<Vec<RentEntry>, CoreError> {
        let mut entries: Vec<RentEntry> = self
            .lock_store()?
            .rent_entries
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.due_date);
        Ok(entries)
    }

    fn update_rent_entry(&self, entry: &RentEntry) -> Result<(), CoreError> {
        self.mutate(|store| {
            let slot = store
                .rent_entries
                .iter_mut()
                .find(|existing| existing.id == entry.id && existing.user_id == entry.user_id)
                .ok_or(CoreError::RentEntryNotFound(entry.id))?;
            *slot = entry.clone();
            Ok(())
        })
    }

    fn delete_rent_entry(&self, user_id: Uuid, id: Uuid) -> Result<(), CoreError> {
        self.mutate(|store| {
            if !store.owns_entry(user_id, id) {
                return Err(CoreError::RentEntryNotFound(id));
            }
            if store.payments.iter().any(|payment| payment.rent_entry_id == id) {
                return Err(CoreError::InvalidOperation(
                    "rent entry already has payments recorded".into(),
                ));
            }
            store.rent_entries.retain(|entry| entry.id != id);
            Ok(())
        })
    }

    fn insert_payment(&self, user_id: Uuid, payment: &PaymentRecord) -> Result<(), CoreError> {
        self.mutate(|store| {
            if !store.owns_entry(user_id, payment.rent_entry_id) {
                return Err(CoreError::RentEntryNotFound(payment.rent_entry_id));
            }
            store.payments.push(payment.clone());
            Ok(())
        })
    }

    fn list_payments(&self, user_id: Uuid) -> Result<Vec<PaymentWithEntry>, CoreError> {
        let store = self.lock_store()?;
        let mut rows: Vec<PaymentWithEntry> = store
            .payments
            .iter()
            .filter_map(|payment| {
                let entry = store
                    .rent_entries
                    .iter()
                    .find(|entry| entry.id == payment.rent_entry_id && entry.user_id == user_id)?;
                Some(PaymentWithEntry::new(payment.clone(), Some(entry.clone())))
            })
            .collect();
        rows.sort_by(|a, b| b.payment.payment_date.cmp(&a.payment.payment_date));
        Ok(rows)
    }

    fn user_settings(&self, user_id: Uuid) -> Result<Option<UserSettings>, CoreError> {
        Ok(self
            .lock_store()?
            .settings
            .iter()
            .find(|settings| settings.user_id == user_id)
            .cloned())
    }

    fn upsert_user_settings(&self, settings: &UserSettings) -> Result<(), CoreError> {
        self.mutate(|store| {
            match store
                .settings
                .iter_mut()
                .find(|existing| existing.user_id == settings.user_id)
            {
                Some(existing) => {
                    let created_at = existing.created_at;
                    *existing = settings.clone();
                    existing.created_at = created_at;
                }
                None => store.settings.push(settings.clone()),
            }
            Ok(())
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn default_hash_rounds() -> u32 {
    HASH_ROUNDS
}

/// Iterated, salted SHA-256 of `salt:password`, hex encoded.
fn hash_password(salt: &str, password: &str, rounds: u32) -> String {
    let mut digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(b":")
        .chain_update(password.as_bytes())
        .finalize();
    for _ in 1..rounds.max(1) {
        digest = Sha256::new()
            .chain_update(digest)
            .chain_update(salt.as_bytes())
            .finalize();
    }
    hex::encode(digest)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, CoreError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CoreError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|err| CoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
