//! Explicit application contexts passed to views instead of process-wide globals.

use tracing::debug;

use rentmate_domain::{Session, UserSettings};

use crate::CoreError;

/// Authentication state of the running application.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    session: Option<Session>,
}

impl AuthContext {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Returns the active session or [`CoreError::NotAuthenticated`].
    pub fn require(&self) -> Result<&Session, CoreError> {
        self.session.as_ref().ok_or(CoreError::NotAuthenticated)
    }

    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }
}

/// Where the current theme value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    Persisted,
    System,
    Account,
    User,
}

/// Dark-mode state of the running application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeContext {
    dark_mode: bool,
    source: ThemeSource,
}

impl ThemeContext {
    /// Uses the locally persisted preference, falling back to the system default.
    pub fn initialize(persisted: Option<bool>, system_default: impl FnOnce() -> bool) -> Self {
        match persisted {
            Some(dark_mode) => Self {
                dark_mode,
                source: ThemeSource::Persisted,
            },
            None => Self {
                dark_mode: system_default(),
                source: ThemeSource::System,
            },
        }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn source(&self) -> ThemeSource {
        self.source
    }

    /// Adopts the preference stored with the signed-in user's settings.
    /// Returns whether the value changed.
    pub fn apply_account_preference(&mut self, settings: Option<&UserSettings>) -> bool {
        let Some(settings) = settings else {
            return false;
        };
        let changed = self.dark_mode != settings.dark_mode;
        self.dark_mode = settings.dark_mode;
        self.source = ThemeSource::Account;
        debug!(dark_mode = self.dark_mode, "theme taken from account settings");
        changed
    }

    /// Flips dark mode and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.source = ThemeSource::User;
        self.dark_mode
    }
}
