use tracing::{info, warn};

use rentmate_domain::{Session, UserSettings};

use crate::{
    backend::RentBackend, context::ThemeContext, time::Clock, validation, CoreError,
};

pub struct SettingsService;

impl SettingsService {
    /// Stored settings, or defaults when the user has never saved any.
    pub fn load(
        backend: &dyn RentBackend,
        clock: &dyn Clock,
        session: &Session,
    ) -> Result<UserSettings, CoreError> {
        Ok(backend
            .user_settings(session.user_id)?
            .unwrap_or_else(|| UserSettings::defaults_for(session.user_id, clock.now())))
    }

    pub fn save(
        backend: &dyn RentBackend,
        clock: &dyn Clock,
        session: &Session,
        mut settings: UserSettings,
    ) -> Result<UserSettings, CoreError> {
        settings.user_id = session.user_id;
        settings.phone_number = rentmate_domain::non_empty(settings.phone_number.take());
        settings.normalize_reminder_days();
        validation::validate_settings(&settings)?;
        settings.updated_at = clock.now();
        backend.upsert_user_settings(&settings)?;
        info!(user_id = %settings.user_id, "settings saved");
        Ok(settings)
    }

    pub fn toggle_reminder_day(settings: &mut UserSettings, day: u32) -> Result<bool, CoreError> {
        validation::validate_reminder_day(day)?;
        Ok(settings.toggle_reminder_day(day))
    }

    /// Flips the theme locally and, when signed in, records it on the account.
    /// A backend failure is logged and the local change kept.
    pub fn toggle_dark_mode(
        backend: &dyn RentBackend,
        clock: &dyn Clock,
        session: Option<&Session>,
        theme: &mut ThemeContext,
    ) -> bool {
        let dark = theme.toggle();
        if let Some(session) = session {
            let result = Self::load(backend, clock, session).and_then(|mut settings| {
                settings.dark_mode = dark;
                settings.updated_at = clock.now();
                backend.upsert_user_settings(&settings)
            });
            if let Err(err) = result {
                warn!(error = %err, "could not store theme preference");
            }
        }
        dark
    }
}
