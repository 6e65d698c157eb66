//! rentmate-config
//!
//! Local preferences for the RentMate shell: display locale, currency, the locally
//! persisted theme choice, and where rent data lives on disk.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, HOME_ENV_VAR};
