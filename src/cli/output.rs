use colored::{ColoredString, Colorize};
use std::fmt;
use std::sync::{OnceLock, RwLock};

use rentmate_core::RentStatus;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputPreferences {
    pub color_enabled: bool,
    pub dark_mode: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            color_enabled: true,
            dark_mode: false,
        }
    }
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    if !prefs.color_enabled {
        colored::control::set_override(false);
    }
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

pub fn current_preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

/// Switches the palette used for headings and muted text.
pub fn set_dark_mode(dark_mode: bool) {
    let mut prefs = current_preferences();
    prefs.dark_mode = dark_mode;
    set_preferences(prefs);
}

fn label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "INFO",
        MessageKind::Success => "OK",
        MessageKind::Warning => "WARNING",
        MessageKind::Error => "ERROR",
        MessageKind::Hint => "HINT",
        MessageKind::Section => "",
    }
}

/// Formats a message without printing it.
pub fn render(kind: MessageKind, message: impl fmt::Display) -> String {
    let prefs = current_preferences();
    let text = message.to_string();
    let plain = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => format!("{}: {}", label(kind), text),
    };
    if !prefs.color_enabled {
        return plain;
    }
    let styled: ColoredString = match kind {
        MessageKind::Success => plain.bright_green(),
        MessageKind::Warning => plain.bright_yellow(),
        MessageKind::Error => plain.bright_red(),
        MessageKind::Hint if prefs.dark_mode => plain.bright_black(),
        MessageKind::Hint => plain.dimmed(),
        MessageKind::Section if prefs.dark_mode => plain.bold().bright_white(),
        MessageKind::Section => plain.bold(),
        MessageKind::Info => return plain,
    };
    styled.to_string()
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = render(kind, message);
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Plain line with no label, used for tables and CSV previews.
pub fn line(text: impl fmt::Display) {
    println!("{text}");
}

/// Colors a status label the way the dashboard badges do.
pub fn status_badge(status: RentStatus, label: &str) -> String {
    if !current_preferences().color_enabled {
        return label.to_string();
    }
    match status {
        RentStatus::Paid => label.green().to_string(),
        RentStatus::Overdue => label.red().bold().to_string(),
        RentStatus::DueSoon => label.yellow().to_string(),
        RentStatus::Upcoming => label.cyan().to_string(),
    }
}
