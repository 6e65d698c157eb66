//! Contract for the hosted backend that owns persistence, authentication, and
//! row-level authorization.

use uuid::Uuid;

use rentmate_domain::{
    AuthProvider, Credentials, PaymentRecord, PaymentWithEntry, RentEntry, Session, UserSettings,
};

use crate::CoreError;

/// Abstraction over backends able to store rent data for authenticated users.
///
/// Every read and write is scoped by the owning user's id; implementations must never
/// return or mutate rows owned by another user.
pub trait RentBackend: Send + Sync {
    fn current_session(&self) -> Result<Option<Session>, CoreError>;
    fn sign_up(&self, credentials: &Credentials) -> Result<Session, CoreError>;
    fn sign_in(&self, credentials: &Credentials) -> Result<Session, CoreError>;
    /// Starts a provider sign-in flow. The flow itself is owned by the backend.
    fn sign_in_with_provider(&self, provider: AuthProvider) -> Result<(), CoreError>;
    fn sign_out(&self) -> Result<(), CoreError>;

    fn insert_rent_entry(&self, entry: &RentEntry) -> Result<(), CoreError>;
    fn rent_entry(&self, user_id: Uuid, id: Uuid) -> Result<Option<RentEntry>, CoreError>;
    /// Entries owned by `user_id`, ordered by due date ascending.
    fn list_rent_entries(&self, user_id: Uuid) -> Result<Vec<RentEntry>, CoreError>;
    fn update_rent_entry(&self, entry: &RentEntry) -> Result<(), CoreError>;
    fn delete_rent_entry(&self, user_id: Uuid, id: Uuid) -> Result<(), CoreError>;

    fn insert_payment(&self, user_id: Uuid, payment: &PaymentRecord) -> Result<(), CoreError>;
    /// Payments against entries owned by `user_id`, most recent payment date first,
    /// each joined with its parent entry.
    fn list_payments(&self, user_id: Uuid) -> Result<Vec<PaymentWithEntry>, CoreError>;

    fn user_settings(&self, user_id: Uuid) -> Result<Option<UserSettings>, CoreError>;
    /// Inserts or replaces the single settings row keyed by `settings.user_id`.
    fn upsert_user_settings(&self, settings: &UserSettings) -> Result<(), CoreError>;
}
