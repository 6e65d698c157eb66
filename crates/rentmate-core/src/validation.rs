//! Validation predicates and form parsing shared by every input surface.

use once_cell::sync::Lazy;
use regex::Regex;

use rentmate_domain::{
    non_empty, Credentials, RentEntryDraft, UserSettings, REMINDER_DAY_CHOICES,
};

use crate::{format::parse_input_date, CoreError};

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

// ASCII digits only; `\d` would also admit other Unicode digits.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]{9,14}$").expect("valid phone pattern"));

/// Permissive single-`@` email check; not RFC 5322.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Optional `+`, a leading 1-9, then 9 to 14 more digits. No separators allowed.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// Raw rent form input as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct RentForm {
    pub amount: String,
    pub due_date: String,
    pub landlord_name: String,
    pub landlord_contact: String,
    pub notes: String,
}

impl RentForm {
    pub fn new(amount: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            due_date: due_date.into(),
            ..Self::default()
        }
    }

    /// Validates the form and converts it into a draft ready for persistence.
    pub fn validate(&self) -> Result<RentEntryDraft, CoreError> {
        if self.amount.trim().is_empty() || self.due_date.trim().is_empty() {
            return Err(CoreError::validation("Amount and due date are required"));
        }
        let amount = parse_amount(&self.amount)?;
        let due_date = parse_input_date(&self.due_date)?;
        Ok(RentEntryDraft {
            amount,
            due_date,
            landlord_name: non_empty(Some(self.landlord_name.clone())),
            landlord_contact: non_empty(Some(self.landlord_contact.clone())),
            notes: non_empty(Some(self.notes.clone())),
        })
    }
}

/// Parses a strictly positive, finite amount.
pub fn parse_amount(input: &str) -> Result<f64, CoreError> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(CoreError::validation("Please enter a valid amount")),
    }
}

pub fn validate_sign_in(email: &str, password: &str) -> Result<Credentials, CoreError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(CoreError::validation(
            "Please enter both email and password",
        ));
    }
    Ok(Credentials::new(email.trim(), password))
}

pub fn validate_sign_up(
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<Credentials, CoreError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(CoreError::validation("All fields are required"));
    }
    if !is_valid_email(email) {
        return Err(CoreError::validation("Please enter a valid email address"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if password != confirm_password {
        return Err(CoreError::validation("Passwords do not match"));
    }
    Ok(Credentials::new(email, password))
}

/// SMS reminders require a phone number the SMS predicate accepts.
pub fn validate_settings(settings: &UserSettings) -> Result<(), CoreError> {
    if settings.sms_reminder {
        let phone_ok = settings
            .phone_number
            .as_deref()
            .map(is_valid_phone)
            .unwrap_or(false);
        if !phone_ok {
            return Err(CoreError::validation(
                "Please enter a valid phone number for SMS reminders",
            ));
        }
    }
    for day in &settings.reminder_days {
        validate_reminder_day(*day)?;
    }
    Ok(())
}

pub fn validate_reminder_day(day: u32) -> Result<(), CoreError> {
    if REMINDER_DAY_CHOICES.contains(&day) {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "reminder day must be one of {:?}",
            REMINDER_DAY_CHOICES
        )))
    }
}
