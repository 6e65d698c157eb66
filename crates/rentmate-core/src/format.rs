//! Presentation helpers for currency amounts and dates.

use chrono::{Datelike, NaiveDate};

use crate::CoreError;

/// Date format used by form inputs.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64, currency: &str) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Whole-unit currency rendering: symbol, grouped thousands, no fraction digits.
#[derive(Debug, Clone)]
pub struct WholeUnitFormatter {
    pub grouping_separator: char,
}

impl Default for WholeUnitFormatter {
    fn default() -> Self {
        Self {
            grouping_separator: ',',
        }
    }
}

impl CurrencyFormatter for WholeUnitFormatter {
    fn format_amount(&self, amount: f64, currency: &str) -> String {
        // f64::round is half-away-from-zero, matching browser currency formatting.
        let rounded = amount.round();
        let mut digits = format!("{:.0}", rounded.abs());
        insert_grouping(&mut digits, self.grouping_separator);
        let symbol = symbol_for(currency);
        let sign = if rounded < 0.0 { "-" } else { "" };
        if symbol.chars().all(|ch| ch.is_ascii_alphabetic()) {
            format!("{sign}{symbol} {digits}")
        } else {
            format!("{sign}{symbol}{digits}")
        }
    }
}

/// Short numeric dates following the conventions of a locale tag.
#[derive(Debug, Clone)]
pub struct LocaleDateFormatter {
    pub locale: String,
}

impl LocaleDateFormatter {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }
}

impl Default for LocaleDateFormatter {
    fn default() -> Self {
        Self::new("en-US")
    }
}

impl DateFormatter for LocaleDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        let tag = self.locale.replace('_', "-").to_ascii_lowercase();
        let pattern = match tag.as_str() {
            "en-us" | "en" => "%-m/%-d/%Y",
            "en-gb" | "en-au" | "en-ie" | "fr-fr" | "es-es" | "it-it" | "pt-br" => "%d/%m/%Y",
            "de-de" | "de-at" | "de-ch" => "%-d.%-m.%Y",
            _ => INPUT_DATE_FORMAT,
        };
        date.format(pattern).to_string()
    }
}

/// Formats an amount in US dollars with no fraction digits, e.g. `$1,200`.
pub fn format_currency(amount: f64) -> String {
    WholeUnitFormatter::default().format_amount(amount, "USD")
}

/// Due-date label used on rent cards, e.g. `Mar 15, 2024`.
pub fn format_due_label(date: NaiveDate) -> String {
    format!("{} {}, {}", month_label(date.month()), date.day(), date.year())
}

pub fn format_date_for_input(date: NaiveDate) -> String {
    date.format(INPUT_DATE_FORMAT).to_string()
}

pub fn parse_input_date(input: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(input.trim(), INPUT_DATE_FORMAT).map_err(|_| {
        CoreError::validation(format!("invalid date `{}` (use YYYY-MM-DD)", input.trim()))
    })
}

pub fn symbol_for(code: &str) -> String {
    match code.to_ascii_uppercase().as_str() {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        "CAD" => "CA$".into(),
        "INR" => "₹".into(),
        other => other.into(),
    }
}

fn insert_grouping(digits: &mut String, separator: char) {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    *digits = grouped;
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}
