use tracing::warn;

use rentmate_core::AuthService;
use rentmate_domain::AuthProvider;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandSpec;
use crate::cli::shell_context::ShellContext;

const SIGNUP_USAGE: &str = "signup <email> <password> <confirm-password>";
const LOGIN_USAGE: &str = "login <email> <password> | login google";

pub(crate) fn definitions() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("signup", "Create an account", SIGNUP_USAGE, cmd_signup),
        CommandSpec::new("login", "Sign in", LOGIN_USAGE, cmd_login),
        CommandSpec::new("logout", "Sign out", "logout", cmd_logout),
        CommandSpec::new("whoami", "Show the signed-in account", "whoami", cmd_whoami),
    ]
}

fn cmd_signup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (email, password, confirm) = match args {
        [email, password, confirm] => {
            (email.to_string(), password.to_string(), confirm.to_string())
        }
        [] if context.can_prompt() => (
            cli_io::prompt_text(&context.theme, "Email", None, false)?,
            cli_io::prompt_password(&context.theme, "Password")?,
            cli_io::prompt_password(&context.theme, "Confirm password")?,
        ),
        _ => return Err(CommandError::usage(SIGNUP_USAGE)),
    };
    let session = AuthService::sign_up(
        context.backend.as_ref(),
        &mut context.auth,
        &email,
        &password,
        &confirm,
    )?;
    after_sign_in(context);
    output::success(format!("Account created. Signed in as {}.", session.email));
    Ok(())
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (email, password) = match args {
        [provider] if provider.eq_ignore_ascii_case("google") => {
            AuthService::sign_in_with_provider(context.backend(), AuthProvider::Google)?;
            return Ok(());
        }
        [email, password] => (email.to_string(), password.to_string()),
        [] if context.can_prompt() => {
            let last = context.config.last_email.clone();
            (
                cli_io::prompt_text(&context.theme, "Email", last.as_deref(), false)?,
                cli_io::prompt_password(&context.theme, "Password")?,
            )
        }
        _ => return Err(CommandError::usage(LOGIN_USAGE)),
    };
    let session = AuthService::sign_in(
        context.backend.as_ref(),
        &mut context.auth,
        &email,
        &password,
    )?;
    after_sign_in(context);
    output::success(format!("Signed in as {}.", session.email));
    Ok(())
}

/// Remembers the email and lets the account's theme take over.
fn after_sign_in(context: &mut ShellContext) {
    let email = context.auth.session().map(|session| session.email.clone());
    if context.config.last_email != email {
        context.config.last_email = email;
        if let Err(err) = context.config_manager.save(&context.config) {
            warn!(error = %err, "could not save config");
        }
    }
    if let Err(err) = context.adopt_account_theme() {
        warn!(error = %err, "could not apply account theme");
    }
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.auth.is_signed_in() {
        output::info("Not signed in.");
        return Ok(());
    }
    AuthService::sign_out(context.backend.as_ref(), &mut context.auth)?;
    output::success("Signed out.");
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.session()?;
    output::info(format!(
        "Signed in as {} since {}",
        session.email,
        session.signed_in_at.format("%Y-%m-%d %H:%M UTC")
    ));
    Ok(())
}
