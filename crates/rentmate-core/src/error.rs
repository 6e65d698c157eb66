use thiserror::Error;
use uuid::Uuid;

/// Message shown for failures the user cannot act on.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("{0}")]
    Validation(String),
    #[error("Rent entry not found: {0}")]
    RentEntryNotFound(Uuid),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Unsupported: {0}")]
    Unsupported(String),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    /// Whether the message is meant to be shown verbatim next to the form that caused it.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            CoreError::NotAuthenticated
                | CoreError::Validation(_)
                | CoreError::RentEntryNotFound(_)
                | CoreError::InvalidOperation(_)
                | CoreError::Auth(_)
                | CoreError::Unsupported(_)
        )
    }

    /// Text to surface to the user; backend and storage failures collapse to a generic message.
    pub fn user_message(&self) -> String {
        if self.is_user_facing() {
            self.to_string()
        } else {
            GENERIC_FAILURE_MESSAGE.to_string()
        }
    }
}
