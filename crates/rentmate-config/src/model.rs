use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable overriding the RentMate home directory.
pub const HOME_ENV_VAR: &str = "RENTMATE_HOME";

const APP_DIR: &str = "rentmate";

/// User preferences kept on this machine only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Last theme chosen on this machine. `None` until the user picks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_email: Option<String>,
    /// Directory for the rent store. Defaults to `<home>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            dark_mode: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
            last_email: None,
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Base directory for config and data: `RENTMATE_HOME`, else the platform data dir.
    pub fn home_dir() -> PathBuf {
        Self::home_dir_from(std::env::var_os(HOME_ENV_VAR).map(PathBuf::from))
    }

    pub fn home_dir_from(override_dir: Option<PathBuf>) -> PathBuf {
        if let Some(path) = override_dir.filter(|p| !p.as_os_str().is_empty()) {
            return path;
        }
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Where the rent store lives: explicit `data_root` first, then `<home>/data`.
    pub fn resolve_data_root(&self, home: &std::path::Path) -> PathBuf {
        self.data_root
            .clone()
            .unwrap_or_else(|| home.join("data"))
    }

    /// Records the theme the user picked so the next launch starts with it.
    pub fn remember_theme(&mut self, dark_mode: bool) {
        self.dark_mode = Some(dark_mode);
    }
}
