use rentmate_core::{
    format::{format_date_for_input, format_due_label},
    validation::RentForm,
    DashboardView, PaymentService, RentService,
};
use rentmate_domain::{Displayable, RentEntry};

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandSpec;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Column, Table};

const ADD_USAGE: &str = "add <amount> <due-date YYYY-MM-DD> [landlord] [contact] [notes]";
const EDIT_USAGE: &str = "edit <#|id> [amount] [due-date] [landlord] [contact] [notes]  (`-` keeps a field)";
const DELETE_USAGE: &str = "delete <#|id> [--yes]";
const PAY_USAGE: &str = "pay <#|id>";

/// Placeholder argument meaning "leave this field as it is".
const KEEP: &str = "-";

pub(crate) fn definitions() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new(
            "dashboard",
            "Show rent entries and recent payments",
            "dashboard",
            cmd_dashboard,
        ),
        CommandSpec::new("add", "Add a rent entry", ADD_USAGE, cmd_add),
        CommandSpec::new("edit", "Edit an unpaid rent entry", EDIT_USAGE, cmd_edit),
        CommandSpec::new("delete", "Delete an unpaid rent entry", DELETE_USAGE, cmd_delete),
        CommandSpec::new("pay", "Mark a rent entry as paid", PAY_USAGE, cmd_pay),
    ]
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.session()?;
    let view = PaymentService::dashboard(context.backend(), context.clock(), &session)?;
    render_dashboard(context, &view);
    Ok(())
}

pub(crate) fn render_dashboard(context: &ShellContext, view: &DashboardView) {
    output::section("Rent Dashboard");
    if view.is_empty() {
        output::info("No rent entries yet. Use `add <amount> <due-date>` to create one.");
    } else {
        let mut table = Table::new(vec![
            Column::right("#"),
            Column::left("Property").max(28),
            Column::right("Amount"),
            Column::left("Due"),
            Column::left("Status"),
        ]);
        for (idx, card) in view.cards.iter().enumerate() {
            table.push(vec![
                (idx + 1).to_string(),
                card.entry.display_label(),
                context.money(card.entry.amount),
                format_due_label(card.entry.due_date),
                output::status_badge(card.status.status, &card.status.label()),
            ]);
        }
        output::line(table.render());
        let unpaid = view.unpaid().count();
        if unpaid > 0 {
            output::hint(format!(
                "{unpaid} unpaid. Use `pay <#>` to mark one as paid or `edit <#>` to change it."
            ));
        }
    }

    output::section("Recent Payments");
    if view.recent_payments.is_empty() {
        output::info("No payments recorded yet.");
        return;
    }
    let mut table = Table::new(vec![
        Column::left("Date"),
        Column::left("Property").max(28),
        Column::right("Amount"),
    ]);
    for row in &view.recent_payments {
        table.push(vec![
            context.date(row.payment.payment_day()),
            row.property_label(),
            context.money(row.payment.amount),
        ]);
    }
    output::line(table.render());
    if view.has_more_payments {
        output::hint("Use `history` to view all payments.");
    }
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let form = if args.is_empty() && context.can_prompt() {
        prompt_form(context, &RentForm::default())?
    } else if args.len() >= 2 && args.len() <= 5 {
        let mut form = RentForm::new(args[0], args[1]);
        fill_optional(&mut form, &args[2..]);
        form
    } else {
        return Err(CommandError::usage(ADD_USAGE));
    };
    let session = context.session()?;
    let entry = RentService::add(context.backend(), context.clock(), &session, &form)?;
    output::success(format!(
        "Rent entry added: {} due {}.",
        context.money(entry.amount),
        format_due_label(entry.due_date)
    ));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(reference) = args.first() else {
        return Err(CommandError::usage(EDIT_USAGE));
    };
    let session = context.session()?;
    let target = context.resolve_entry(reference)?;
    let entry = RentService::load_for_edit(context.backend(), &session, target.id)?;
    let current = form_from_entry(&entry);

    let form = if args.len() == 1 && context.can_prompt() {
        prompt_form(context, &current)?
    } else if args.len() > 1 && args.len() <= 6 {
        apply_overrides(current, &args[1..])
    } else {
        return Err(CommandError::usage(EDIT_USAGE));
    };
    let updated = RentService::update(context.backend(), context.clock(), &session, entry.id, &form)?;
    output::success(format!(
        "Rent entry updated: {} due {}.",
        context.money(updated.amount),
        format_due_label(updated.due_date)
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (reference, confirmed) = match args {
        [reference] => (*reference, false),
        [reference, flag] if *flag == "--yes" || *flag == "-y" => (*reference, true),
        _ => return Err(CommandError::usage(DELETE_USAGE)),
    };
    let session = context.session()?;
    let entry = context.resolve_entry(reference)?;
    if !confirmed && context.can_prompt() {
        let prompt = format!(
            "Delete {} due {}?",
            entry.display_label(),
            format_due_label(entry.due_date)
        );
        if !cli_io::confirm_action(&context.theme, &prompt, false)? {
            output::info("Delete cancelled.");
            return Ok(());
        }
    }
    RentService::delete(context.backend(), &session, entry.id)?;
    output::success(format!("Deleted {}.", entry.display_label()));
    Ok(())
}

fn cmd_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference] = args else {
        return Err(CommandError::usage(PAY_USAGE));
    };
    let session = context.session()?;
    let entry = context.resolve_entry(reference)?;
    let payment = PaymentService::mark_paid(context.backend(), context.clock(), &session, entry.id)?;
    output::success(format!(
        "Marked {} as paid ({}).",
        entry.display_label(),
        context.money(payment.amount)
    ));
    Ok(())
}

fn form_from_entry(entry: &RentEntry) -> RentForm {
    RentForm {
        amount: entry.amount.to_string(),
        due_date: format_date_for_input(entry.due_date),
        landlord_name: entry.landlord_name.clone().unwrap_or_default(),
        landlord_contact: entry.landlord_contact.clone().unwrap_or_default(),
        notes: entry.notes.clone().unwrap_or_default(),
    }
}

fn fill_optional(form: &mut RentForm, rest: &[&str]) {
    let slots = [
        &mut form.landlord_name,
        &mut form.landlord_contact,
        &mut form.notes,
    ];
    for (slot, value) in slots.into_iter().zip(rest) {
        *slot = value.to_string();
    }
}

/// Positional overrides in form order; `-` keeps the current value.
fn apply_overrides(mut form: RentForm, values: &[&str]) -> RentForm {
    let slots = [
        &mut form.amount,
        &mut form.due_date,
        &mut form.landlord_name,
        &mut form.landlord_contact,
        &mut form.notes,
    ];
    for (slot, value) in slots.into_iter().zip(values) {
        if *value != KEEP {
            *slot = value.to_string();
        }
    }
    form
}

fn prompt_form(context: &ShellContext, initial: &RentForm) -> Result<RentForm, CommandError> {
    let field = |label: &str, value: &str, allow_empty: bool| {
        let initial = (!value.is_empty()).then_some(value);
        cli_io::prompt_text(&context.theme, label, initial, allow_empty)
    };
    Ok(RentForm {
        amount: field("Amount", &initial.amount, false)?,
        due_date: field("Due date (YYYY-MM-DD)", &initial.due_date, false)?,
        landlord_name: field("Landlord name", &initial.landlord_name, true)?,
        landlord_contact: field("Landlord contact", &initial.landlord_contact, true)?,
        notes: field("Notes", &initial.notes, true)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rentmate_domain::RentEntryDraft;
    use uuid::Uuid;

    #[test]
    fn overrides_keep_dashed_fields() {
        let entry = RentEntry::new(
            Uuid::new_v4(),
            RentEntryDraft::new(1200.0, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
                .with_landlord("Acme"),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        );
        let form = apply_overrides(form_from_entry(&entry), &["-", "2024-04-01", "-", "555"]);
        assert_eq!(form.amount, "1200");
        assert_eq!(form.due_date, "2024-04-01");
        assert_eq!(form.landlord_name, "Acme");
        assert_eq!(form.landlord_contact, "555");
        assert_eq!(form.notes, "");
    }

    #[test]
    fn optional_add_fields_fill_in_order() {
        let mut form = RentForm::new("900", "2024-05-01");
        fill_optional(&mut form, &["Jane", "jane@example.com"]);
        assert_eq!(form.landlord_name, "Jane");
        assert_eq!(form.landlord_contact, "jane@example.com");
        assert!(form.notes.is_empty());
    }
}
