pub mod auth;
pub mod config;
pub mod history;
pub mod rent;
pub mod settings;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    registry.extend(system::definitions());
    registry.extend(auth::definitions());
    registry.extend(rent::definitions());
    registry.extend(history::definitions());
    registry.extend(settings::definitions());
    registry.extend(config::definitions());
}

/// Parses `on`/`off` style switches.
pub(crate) fn parse_switch(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "enable" => Ok(true),
        "off" | "no" | "false" | "disable" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected `on` or `off`, got `{other}`"
        ))),
    }
}

pub(crate) fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
