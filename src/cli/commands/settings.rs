use tracing::warn;

use rentmate_core::{PaymentIndex, PaymentService, ReminderPlanner, RentService, SettingsService};
use rentmate_domain::{reminder_day_label, UserSettings, REMINDER_DAY_CHOICES};

use crate::cli::commands::{on_off, parse_switch};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandSpec;
use crate::cli::shell_context::ShellContext;

const REMINDER_DAY_USAGE: &str = "reminder-day <3|2|1|0>";
const SMS_USAGE: &str = "sms <on|off> [phone]";
const EMAIL_USAGE: &str = "email <on|off>";
const PHONE_USAGE: &str = "phone <number|clear>";
const THEME_USAGE: &str = "theme [dark|light|toggle]";

pub(crate) fn definitions() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("settings", "Show reminder settings", "settings", cmd_settings),
        CommandSpec::new(
            "reminder-day",
            "Toggle a reminder lead time",
            REMINDER_DAY_USAGE,
            cmd_reminder_day,
        ),
        CommandSpec::new("sms", "Turn SMS reminders on or off", SMS_USAGE, cmd_sms),
        CommandSpec::new("email", "Turn email reminders on or off", EMAIL_USAGE, cmd_email),
        CommandSpec::new("phone", "Set the SMS phone number", PHONE_USAGE, cmd_phone),
        CommandSpec::new("theme", "Switch between light and dark mode", THEME_USAGE, cmd_theme),
        CommandSpec::new(
            "reminders",
            "Show reminders due today",
            "reminders",
            cmd_reminders,
        ),
    ]
}

fn load(context: &ShellContext) -> Result<UserSettings, CommandError> {
    let session = context.session()?;
    Ok(SettingsService::load(
        context.backend(),
        context.clock(),
        &session,
    )?)
}

fn save(context: &ShellContext, settings: UserSettings) -> Result<UserSettings, CommandError> {
    let session = context.session()?;
    Ok(SettingsService::save(
        context.backend(),
        context.clock(),
        &session,
        settings,
    )?)
}

fn cmd_settings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let settings = load(context)?;
    output::section("Settings");
    output::line(format!("  Email reminders : {}", on_off(settings.email_reminder)));
    output::line(format!("  SMS reminders   : {}", on_off(settings.sms_reminder)));
    output::line(format!(
        "  Phone number    : {}",
        settings.phone_number.as_deref().unwrap_or("(none)")
    ));
    output::line("  Remind me       :");
    for day in REMINDER_DAY_CHOICES {
        let mark = if settings.reminder_days.contains(&day) {
            "[x]"
        } else {
            "[ ]"
        };
        output::line(format!("    {mark} {}", reminder_day_label(day)));
    }
    output::line(format!(
        "  Dark mode       : {}",
        on_off(context.appearance.dark_mode())
    ));
    Ok(())
}

fn cmd_reminder_day(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(CommandError::usage(REMINDER_DAY_USAGE));
    };
    let day: u32 = raw
        .parse()
        .map_err(|_| CommandError::usage(REMINDER_DAY_USAGE))?;
    let mut settings = load(context)?;
    let enabled = SettingsService::toggle_reminder_day(&mut settings, day)?;
    save(context, settings)?;
    output::success(format!(
        "Reminder \"{}\" {}.",
        reminder_day_label(day),
        if enabled { "enabled" } else { "disabled" }
    ));
    Ok(())
}

fn cmd_sms(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (switch, phone) = match args {
        [switch] => (*switch, None),
        [switch, phone] => (*switch, Some(*phone)),
        _ => return Err(CommandError::usage(SMS_USAGE)),
    };
    let mut settings = load(context)?;
    settings.sms_reminder = parse_switch(switch)?;
    if let Some(phone) = phone {
        settings.phone_number = Some(phone.to_string());
    }
    let saved = save(context, settings)?;
    output::success(format!("SMS reminders {}.", on_off(saved.sms_reminder)));
    Ok(())
}

fn cmd_email(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [switch] = args else {
        return Err(CommandError::usage(EMAIL_USAGE));
    };
    let mut settings = load(context)?;
    settings.email_reminder = parse_switch(switch)?;
    let saved = save(context, settings)?;
    output::success(format!("Email reminders {}.", on_off(saved.email_reminder)));
    Ok(())
}

fn cmd_phone(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(CommandError::usage(PHONE_USAGE));
    };
    let mut settings = load(context)?;
    settings.phone_number = if raw.eq_ignore_ascii_case("clear") {
        None
    } else {
        Some(raw.to_string())
    };
    let saved = save(context, settings)?;
    match saved.phone_number {
        Some(phone) => output::success(format!("Phone number set to {phone}.")),
        None => output::success("Phone number cleared."),
    }
    Ok(())
}

fn cmd_theme(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let wanted = match args {
        [] => None,
        [mode] => match mode.to_ascii_lowercase().as_str() {
            "dark" => Some(true),
            "light" => Some(false),
            "toggle" => None,
            _ => return Err(CommandError::usage(THEME_USAGE)),
        },
        _ => return Err(CommandError::usage(THEME_USAGE)),
    };
    if wanted != Some(context.appearance.dark_mode()) {
        let session = context.auth.session().cloned();
        SettingsService::toggle_dark_mode(
            context.backend.as_ref(),
            context.clock.as_ref(),
            session.as_ref(),
            &mut context.appearance,
        );
    }
    if let Err(err) = context.remember_theme() {
        warn!(error = %err, "could not persist theme locally");
    }
    output::success(format!(
        "Dark mode {}.",
        on_off(context.appearance.dark_mode())
    ));
    Ok(())
}

fn cmd_reminders(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.session()?;
    let settings = load(context)?;
    let entries = RentService::list(context.backend(), &session)?;
    let payments = PaymentService::list(context.backend(), &session)?;
    let index = PaymentIndex::from_history(&payments);
    let planned = ReminderPlanner::plan(&entries, &index, &settings, context.clock().now());

    output::section("Reminders");
    if ReminderPlanner::channels(&settings).is_empty() {
        output::info("All reminder channels are off.");
        return Ok(());
    }
    if planned.is_empty() {
        output::info("No reminders due today.");
        return Ok(());
    }
    for reminder in planned {
        let channels: Vec<String> = reminder.channels.iter().map(ToString::to_string).collect();
        output::line(format!("  {} [{}]", reminder.message, channels.join(", ")));
    }
    Ok(())
}
