use std::{fs, path::PathBuf, str::FromStr};

use chrono::Datelike;
use tracing::info;

use rentmate_core::{
    history::year_options, HistoryAggregator, HistoryFilter, MonthFilter, PaymentService,
};
use rentmate_domain::PaymentWithEntry;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandSpec;
use crate::cli::shell_context::ShellContext;
use crate::cli::table::{Column, Table};

const HISTORY_USAGE: &str = "history [month|all] [year]";
const EXPORT_USAGE: &str = "export [month|all] [year] [path]";

pub(crate) fn definitions() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new(
            "history",
            "List payments for a month or year",
            HISTORY_USAGE,
            cmd_history,
        ),
        CommandSpec::new(
            "export",
            "Export filtered payments as CSV",
            EXPORT_USAGE,
            cmd_export,
        ),
    ]
}

/// Month defaults to `all`, year to the current one.
pub(crate) fn parse_filter(
    args: &[&str],
    current_year: i32,
) -> Result<HistoryFilter, CommandError> {
    let month = match args.first() {
        Some(raw) => MonthFilter::from_str(raw)?,
        None => MonthFilter::All,
    };
    let year = match args.get(1) {
        Some(raw) => raw
            .parse::<i32>()
            .map_err(|_| CommandError::InvalidArguments(format!("invalid year `{raw}`")))?,
        None => current_year,
    };
    let options = year_options(current_year);
    if !options.contains(&year) {
        return Err(CommandError::InvalidArguments(format!(
            "year must be between {} and {}",
            options[0],
            options[options.len() - 1]
        )));
    }
    Ok(HistoryFilter::new(month, year))
}

fn describe(filter: &HistoryFilter) -> String {
    match filter.month {
        MonthFilter::All => filter.year.to_string(),
        MonthFilter::Month(_) => format!("{} {}", filter.month, filter.year),
    }
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 2 {
        return Err(CommandError::usage(HISTORY_USAGE));
    }
    let filter = parse_filter(args, context.clock().today().year())?;
    let session = context.session()?;
    let summary = PaymentService::history(context.backend(), &session, &filter)?;

    output::section(format!("Payment History: {}", describe(&filter)));
    if summary.is_empty() {
        output::info("No payments found for the selected period.");
        return Ok(());
    }
    output::line(history_table(context, &summary.records).render());
    output::info(format!(
        "Total paid: {} across {} payment{}",
        context.money(summary.total),
        summary.count(),
        if summary.count() == 1 { "" } else { "s" }
    ));
    Ok(())
}

fn history_table(context: &ShellContext, rows: &[PaymentWithEntry]) -> Table {
    let mut table = Table::new(vec![
        Column::left("Date"),
        Column::left("Property").max(24),
        Column::right("Amount"),
        Column::left("Method"),
        Column::left("Notes").max(36),
    ]);
    for row in rows {
        table.push(vec![
            context.date(row.payment.payment_day()),
            row.property_label(),
            context.money(row.payment.amount),
            row.payment.method_label().to_string(),
            row.payment.notes.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 3 {
        return Err(CommandError::usage(EXPORT_USAGE));
    }
    let filter = parse_filter(&args[..args.len().min(2)], context.clock().today().year())?;
    let session = context.session()?;
    let summary = PaymentService::history(context.backend(), &session, &filter)?;
    let csv = HistoryAggregator::export_csv(&summary.records, &context.date_formatter());

    let target = match args.get(2).map(PathBuf::from) {
        Some(path) if path.is_dir() => path.join(filter.export_file_name()),
        Some(path) => path,
        None => context.export_dir.join(filter.export_file_name()),
    };
    fs::write(&target, csv)?;
    info!(path = %target.display(), rows = summary.count(), "exported payment history");
    output::success(format!(
        "Exported {} payment{} to {}",
        summary.count(),
        if summary.count() == 1 { "" } else { "s" },
        target.display()
    ));
    Ok(())
}
