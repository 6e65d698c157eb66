use std::{env, path::PathBuf};

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use tracing::{error, info};
use uuid::Uuid;

use rentmate_config::{Config, ConfigManager};
use rentmate_core::{
    format::{CurrencyFormatter, DateFormatter, LocaleDateFormatter, WholeUnitFormatter},
    AuthContext, AuthService, Clock, CoreError, RentBackend, RentService, SystemClock,
    ThemeContext,
};
use rentmate_domain::{RentEntry, Session};
use rentmate_storage_json::JsonRentStore;

use crate::cli::{
    commands,
    core::{CommandError, CommandResult, LoopControl},
    help, io as cli_io,
    output::{self, OutputPreferences},
    registry::{CommandRegistry, Lookup},
};
use crate::errors::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub auth: AuthContext,
    pub appearance: ThemeContext,
    /// Directory CSV exports are written to when no path is given.
    pub export_dir: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
    pub backend: Box<dyn RentBackend>,
    pub clock: Box<dyn Clock>,
}

impl ShellContext {
    /// Opens config and the rent store under the RentMate home directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let home = Config::home_dir();
        let config_manager = ConfigManager::with_base_dir(&home)?;
        let config = config_manager.load()?;
        let data_root = config.resolve_data_root(&home);
        let store = JsonRentStore::open(&data_root)?;
        info!(home = %home.display(), data = %data_root.display(), "shell starting");
        Self::with_parts(
            mode,
            Box::new(store),
            Box::new(SystemClock),
            config_manager,
            config,
        )
    }

    pub fn with_parts(
        mode: CliMode,
        backend: Box<dyn RentBackend>,
        clock: Box<dyn Clock>,
        config_manager: ConfigManager,
        config: Config,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let auth = AuthService::restore(backend.as_ref())?;
        let appearance = ThemeContext::initialize(config.dark_mode, system_prefers_dark);
        let export_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let mut context = Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            auth,
            appearance,
            export_dir,
            last_command: None,
            running: true,
            backend,
            clock,
        };
        context.apply_output_preferences();
        if context.auth.is_signed_in() {
            if let Err(err) = context.adopt_account_theme() {
                error!(error = %err, "could not load account theme");
            }
        }
        Ok(context)
    }

    pub fn backend(&self) -> &dyn RentBackend {
        self.backend.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn session(&self) -> Result<Session, CommandError> {
        self.auth.require().cloned().map_err(CommandError::from)
    }

    pub fn prompt(&self) -> String {
        match self.auth.session() {
            Some(session) => format!("rentmate({})> ", session.email),
            None => "rentmate> ".to_string(),
        }
    }

    pub fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub fn money(&self, amount: f64) -> String {
        WholeUnitFormatter::default().format_amount(amount, &self.config.currency)
    }

    pub fn date(&self, date: NaiveDate) -> String {
        self.date_formatter().format_date(date)
    }

    pub fn date_formatter(&self) -> LocaleDateFormatter {
        LocaleDateFormatter::new(self.config.locale.clone())
    }

    /// The account's stored theme wins over the local one after sign-in.
    pub fn adopt_account_theme(&mut self) -> Result<(), CommandError> {
        let session = self.session()?;
        let settings = self.backend.user_settings(session.user_id)?;
        if settings.is_some() {
            self.appearance.apply_account_preference(settings.as_ref());
            self.remember_theme()?;
        }
        Ok(())
    }

    /// Applies the current theme to output and stores it locally.
    pub fn remember_theme(&mut self) -> CommandResult {
        let dark = self.appearance.dark_mode();
        output::set_dark_mode(dark);
        if self.config.dark_mode != Some(dark) {
            self.config.remember_theme(dark);
            self.config_manager.save(&self.config)?;
        }
        Ok(())
    }

    /// Pushes color and theme choices to the output helpers.
    pub fn apply_output_preferences(&self) {
        output::set_preferences(OutputPreferences {
            color_enabled: self.config.ui_color_enabled && self.mode == CliMode::Interactive,
            dark_mode: self.appearance.dark_mode(),
        });
    }

    /// Swaps in a restored config; a stored theme in it takes effect immediately.
    pub fn replace_config(&mut self, config: Config) {
        if config.dark_mode.is_some() {
            self.appearance = ThemeContext::initialize(config.dark_mode, system_prefers_dark);
        }
        self.config = config;
        self.apply_output_preferences();
    }

    /// Rent entry by 1-based position in the due-date listing or by id prefix.
    pub fn resolve_entry(&self, reference: &str) -> Result<RentEntry, CommandError> {
        let session = self.session()?;
        let entries = RentService::list(self.backend(), &session)?;
        if let Ok(position) = reference.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|idx| entries.get(idx))
                .cloned()
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!("no rent entry #{reference}"))
                });
        }
        let needle = reference.to_ascii_lowercase();
        if let Ok(id) = Uuid::parse_str(&needle) {
            return entries
                .into_iter()
                .find(|entry| entry.id == id)
                .ok_or(CommandError::Core(CoreError::RentEntryNotFound(id)));
        }
        let mut matches = entries
            .into_iter()
            .filter(|entry| entry.id.to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry),
            (Some(_), Some(_)) => Err(CommandError::InvalidArguments(format!(
                "`{reference}` matches more than one rent entry"
            ))),
            (None, _) => Err(CommandError::InvalidArguments(format!(
                "no rent entry matches `{reference}`"
            ))),
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let handler = match self.registry.lookup(command) {
            Lookup::Found(spec) => spec.handler,
            Lookup::Unknown { suggestion } => {
                help::print_unknown(raw, suggestion);
                return Ok(LoopControl::Continue);
            }
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit RentMate?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::NotSignedIn => {
                output::error("Please sign in first.");
                output::hint("Use `login <email> <password>` or `signup`.");
            }
            CommandError::Core(core) => {
                if !core.is_user_facing() {
                    error!(error = %core, "command failed");
                }
                output::error(core.user_message());
            }
            other => output::error(other),
        }
    }
}

/// Terminal background hint from `COLORFGBG` (`fg;bg`); background 0 is black.
fn system_prefers_dark() -> bool {
    env::var("COLORFGBG")
        .ok()
        .and_then(|value| value.rsplit(';').next().map(|bg| bg.trim() == "0"))
        .unwrap_or(false)
}

/// Script-mode shell over a temp dir, pinned to 2024-03-10 12:00 UTC.
#[cfg(test)]
pub(crate) fn test_context(dir: &tempfile::TempDir) -> ShellContext {
    use chrono::{TimeZone, Utc};

    let clock = rentmate_core::FixedClock(Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap());
    let store = JsonRentStore::open(dir.path().join("data"))
        .expect("store")
        .with_clock(clock);
    let config_manager = ConfigManager::with_base_dir(dir.path()).expect("config");
    let mut context = ShellContext::with_parts(
        CliMode::Script,
        Box::new(store),
        Box::new(clock),
        config_manager,
        Config::default(),
    )
    .expect("context");
    context.export_dir = dir.path().to_path_buf();
    context
}
