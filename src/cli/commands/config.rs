use tracing::info;

use crate::cli::commands::{on_off, parse_switch};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandSpec;
use crate::cli::shell_context::ShellContext;

const CONFIG_USAGE: &str =
    "config [show|set <locale|currency|color> <value>|backup [note]|backups|restore <name|#>]";

pub(crate) fn definitions() -> Vec<CommandSpec> {
    vec![CommandSpec::new(
        "config",
        "Show, change, back up or restore local preferences",
        CONFIG_USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return show(context);
    };
    match (action.to_ascii_lowercase().as_str(), rest) {
        ("show", []) => show(context),
        ("set", [key, value]) => set(context, key, value),
        ("backup", note) => backup(context, note),
        ("backups", []) => list_backups(context),
        ("restore", [reference]) => restore(context, reference),
        _ => Err(CommandError::usage(CONFIG_USAGE)),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    let theme = match config.dark_mode {
        Some(true) => "dark",
        Some(false) => "light",
        None => "system default",
    };
    output::section("Configuration");
    output::line(format!("  Locale     : {}", config.locale));
    output::line(format!("  Currency   : {}", config.currency));
    output::line(format!("  Color      : {}", on_off(config.ui_color_enabled)));
    output::line(format!("  Theme      : {theme}"));
    output::line(format!(
        "  Last email : {}",
        config.last_email.as_deref().unwrap_or("(none)")
    ));
    output::line(format!(
        "  File       : {}",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let key = key.to_ascii_lowercase();
    match key.as_str() {
        "locale" => context.config.locale = value.to_string(),
        "currency" => {
            if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(CommandError::InvalidArguments(format!(
                    "currency must be a three-letter code, got `{value}`"
                )));
            }
            context.config.currency = value.to_ascii_uppercase();
        }
        "color" => context.config.ui_color_enabled = parse_switch(value)?,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{other}` (use locale, currency or color)"
            )))
        }
    }
    context.config_manager.save(&context.config)?;
    context.apply_output_preferences();
    output::success(format!("Updated {key}."));
    Ok(())
}

fn backup(context: &ShellContext, note: &[&str]) -> CommandResult {
    let note = (!note.is_empty()).then(|| note.join(" "));
    let name = context
        .config_manager
        .backup(&context.config, note.as_deref())?;
    info!(backup = %name, "config backup written");
    output::success(format!("Configuration backed up as {name}."));
    Ok(())
}

fn list_backups(context: &ShellContext) -> CommandResult {
    let names = context.config_manager.list_backups()?;
    output::section("Configuration Backups");
    if names.is_empty() {
        output::info("No configuration backups yet. Use `config backup [note]`.");
        return Ok(());
    }
    for (idx, name) in names.iter().enumerate() {
        output::line(format!("  {:>2}. {name}", idx + 1));
    }
    Ok(())
}

/// Restores by file name or by position in the newest-first listing.
fn restore(context: &mut ShellContext, reference: &str) -> CommandResult {
    let name = match reference.parse::<usize>() {
        Ok(position) => context
            .config_manager
            .list_backups()?
            .into_iter()
            .nth(position.saturating_sub(1))
            .filter(|_| position > 0)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("no configuration backup #{reference}"))
            })?,
        Err(_) => reference.to_string(),
    };
    let restored = context.config_manager.restore(&name)?;
    context.replace_config(restored);
    info!(backup = %name, "config restored");
    output::success(format!("Configuration restored from {name}."));
    Ok(())
}
