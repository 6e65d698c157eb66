//! Shared traits for rent-tracking entities.

use uuid::Uuid;

/// Exposes a stable identifier for entities owned by the backend.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Ties an entity to the user that owns it.
pub trait OwnedByUser {
    fn user_id(&self) -> Uuid;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Label used when a rent entry carries no landlord name.
pub const DEFAULT_RENT_LABEL: &str = "Monthly Rent";

/// Returns the trimmed value, or `None` when the input is blank.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_drops_blank_values() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(Some(" Jane ".into())), Some("Jane".into()));
    }
}
