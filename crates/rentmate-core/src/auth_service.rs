use tracing::info;

use rentmate_domain::{AuthProvider, Session};

use crate::{
    backend::RentBackend,
    context::AuthContext,
    validation::{validate_sign_in, validate_sign_up},
    CoreError,
};

/// Validates credential forms and hands them to the backend.
pub struct AuthService;

impl AuthService {
    /// Restores whatever session the backend still holds.
    pub fn restore(backend: &dyn RentBackend) -> Result<AuthContext, CoreError> {
        Ok(AuthContext::new(backend.current_session()?))
    }

    pub fn sign_up(
        backend: &dyn RentBackend,
        auth: &mut AuthContext,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Session, CoreError> {
        let credentials = validate_sign_up(email, password, confirm_password)?;
        let session = backend.sign_up(&credentials)?;
        info!(user_id = %session.user_id, "account created");
        auth.set_session(Some(session.clone()));
        Ok(session)
    }

    pub fn sign_in(
        backend: &dyn RentBackend,
        auth: &mut AuthContext,
        email: &str,
        password: &str,
    ) -> Result<Session, CoreError> {
        let credentials = validate_sign_in(email, password)?;
        let session = backend.sign_in(&credentials)?;
        info!(user_id = %session.user_id, "signed in");
        auth.set_session(Some(session.clone()));
        Ok(session)
    }

    pub fn sign_in_with_provider(
        backend: &dyn RentBackend,
        provider: AuthProvider,
    ) -> Result<(), CoreError> {
        backend.sign_in_with_provider(provider)
    }

    /// Clears the local session even when the backend call fails.
    pub fn sign_out(backend: &dyn RentBackend, auth: &mut AuthContext) -> Result<(), CoreError> {
        let result = backend.sign_out();
        auth.set_session(None);
        if result.is_ok() {
            info!("signed out");
        }
        result
    }
}
