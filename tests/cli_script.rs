mod common;

use chrono::{Datelike, Duration, Utc};
use predicates::{prelude::PredicateBooleanExt, str::contains};
use regex::Regex;

use common::{script_command, test_home};

fn in_days(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

#[test]
fn signup_validation_messages_are_shown() {
    let home = test_home();
    script_command(&home)
        .write_stdin("signup not-an-email secret1 secret1\nsignup a@b.co 12345 12345\nsignup a@b.co secret1 secret2\n")
        .assert()
        .success()
        .stdout(
            contains("Please enter a valid email address")
                .and(contains("Password must be at least 6 characters long"))
                .and(contains("Passwords do not match")),
        );
}

#[test]
fn rent_flow_tracks_status_and_payments() {
    let home = test_home();
    let script = format!(
        "signup tenant@example.com secret1 secret1\n\
         add 1200 {} \"Sunset Apartments\" 555-0100\n\
         add 950 {}\n\
         dashboard\n\
         pay 1\n\
         pay 1\n\
         dashboard\n",
        in_days(30),
        in_days(-2),
    );
    script_command(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(
            contains("Rent entry added: $1,200")
                .and(contains("Overdue by"))
                .and(contains("Sunset Apartments"))
                .and(contains("Marked Monthly Rent as paid ($950)."))
                .and(contains("rent entry is already paid"))
                .and(contains("Recent Payments")),
        );
}

#[test]
fn session_survives_between_runs() {
    let home = test_home();
    script_command(&home)
        .write_stdin("signup a@b.co secret1 secret1\n")
        .assert()
        .success();
    script_command(&home)
        .write_stdin("whoami\nlogout\nwhoami\n")
        .assert()
        .success()
        .stdout(
            contains("Signed in as a@b.co")
                .and(contains("Signed out."))
                .and(contains("Please sign in first.")),
        );
    script_command(&home)
        .write_stdin("login a@b.co wrongpw\nlogin a@b.co secret1\n")
        .assert()
        .success()
        .stdout(contains("Something went wrong").not().and(contains("Signed in as a@b.co.")));
}

#[test]
fn export_writes_csv_into_working_directory() {
    let home = test_home();
    let year = Utc::now().year();
    let script = format!(
        "signup a@b.co secret1 secret1\nadd 700 {}\npay 1\nhistory all {year}\nexport all {year}\n",
        in_days(1)
    );
    script_command(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Total paid: $700 across 1 payment").and(contains("Exported 1 payment")));

    let path = home.join(format!("rent-payments-{year}-all.csv"));
    let csv = std::fs::read_to_string(path).expect("csv exported");
    let row = Regex::new(r#"^\d{1,2}/\d{1,2}/\d{4},700,manual,"Marked as paid via dashboard"$"#)
        .expect("regex");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Payment Date,Amount,Method,Notes");
    assert!(row.is_match(lines[1]), "unexpected row: {}", lines[1]);
}

#[test]
fn settings_commands_update_preferences() {
    let home = test_home();
    script_command(&home)
        .write_stdin(
            "signup a@b.co secret1 secret1\nsms on\nsms on +15551234567\nreminder-day 0\nemail off\nsettings\n",
        )
        .assert()
        .success()
        .stdout(
            contains("Please enter a valid phone number for SMS reminders")
                .and(contains("SMS reminders on."))
                .and(contains("Reminder \"On due date\" disabled."))
                .and(contains("Email reminders off."))
                .and(contains("[ ] On due date"))
                .and(contains("[x] 3 days before")),
        );
}

#[test]
fn reminders_list_entries_matching_lead_times() {
    let home = test_home();
    let script = format!(
        "signup a@b.co secret1 secret1\nadd 800 {} Acme\nreminders\n",
        in_days(3)
    );
    script_command(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Acme: $800 due").and(contains("(3 days before) [email]")));
}

#[test]
fn config_backup_and_restore_round_trip() {
    let home = test_home();
    script_command(&home)
        .write_stdin(
            "config set currency EUR\nconfig backup first\nconfig set locale en-GB\nconfig backups\nconfig restore 1\nconfig show\nconfig restore nope.json\n",
        )
        .assert()
        .success()
        .stdout(
            contains("Configuration backed up as config_")
                .and(contains("1. config_"))
                .and(contains("Configuration restored from config_"))
                .and(contains("Locale     : en-US"))
                .and(contains("Currency   : EUR"))
                .and(contains("configuration backup `nope.json` not found")),
        );
}
