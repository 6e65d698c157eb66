//! Payment history filtering, totals, and CSV export.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};

use rentmate_domain::PaymentWithEntry;

use crate::{format::DateFormatter, CoreError};

pub const CSV_HEADER: &str = "Payment Date,Amount,Method,Notes";

/// Number of years offered on either side of the current year.
pub const YEAR_OPTION_SPAN: i32 = 5;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar month number, always within 1 through 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarMonth(u32);

impl CalendarMonth {
    pub fn new(number: u32) -> Result<Self, CoreError> {
        if (1..=12).contains(&number) {
            Ok(Self(number))
        } else {
            Err(CoreError::validation(format!("invalid month `{number}`")))
        }
    }

    pub fn number(self) -> u32 {
        self.0
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[self.0 as usize - 1]
    }
}

/// Month selector for the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(CalendarMonth),
}

impl MonthFilter {
    pub fn month(number: u32) -> Result<Self, CoreError> {
        CalendarMonth::new(number).map(MonthFilter::Month)
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Month(month) => f.write_str(month.name()),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }
        if let Some(index) = MONTH_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(trimmed))
        {
            return MonthFilter::month(index as u32 + 1);
        }
        match trimmed.parse::<u32>() {
            Ok(number) => MonthFilter::month(number),
            Err(_) => Err(CoreError::validation(format!(
                "unknown month `{trimmed}` (use `all` or a month name)"
            ))),
        }
    }
}

/// Month and year selection applied to payment history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryFilter {
    pub month: MonthFilter,
    pub year: i32,
}

impl HistoryFilter {
    pub fn new(month: MonthFilter, year: i32) -> Self {
        Self { month, year }
    }

    pub fn whole_year(year: i32) -> Self {
        Self::new(MonthFilter::All, year)
    }

    /// Inclusive first and last calendar day covered by the filter.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self.month {
            MonthFilter::All => Some((
                NaiveDate::from_ymd_opt(self.year, 1, 1)?,
                NaiveDate::from_ymd_opt(self.year, 12, 31)?,
            )),
            MonthFilter::Month(month) => {
                let first = NaiveDate::from_ymd_opt(self.year, month.number(), 1)?;
                Some((first, last_day_of_month(first)?))
            }
        }
    }

    pub fn matches(&self, day: NaiveDate) -> bool {
        self.date_range()
            .map(|(start, end)| start <= day && day <= end)
            .unwrap_or(false)
    }

    /// Download name for the CSV export, e.g. `rent-payments-2024-March.csv`.
    pub fn export_file_name(&self) -> String {
        format!("rent-payments-{}-{}.csv", self.year, self.month)
    }
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

/// Filtered history rows with their aggregate.
#[derive(Debug, Clone, Default)]
pub struct HistorySummary {
    pub records: Vec<PaymentWithEntry>,
    pub total: f64,
}

impl HistorySummary {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct HistoryAggregator;

impl HistoryAggregator {
    /// Keeps the payments inside the filter window, preserving input order.
    pub fn filter(payments: &[PaymentWithEntry], filter: &HistoryFilter) -> HistorySummary {
        let records: Vec<PaymentWithEntry> = payments
            .iter()
            .filter(|row| filter.matches(row.payment.payment_day()))
            .cloned()
            .collect();
        let total = Self::total(&records);
        HistorySummary { records, total }
    }

    pub fn total(records: &[PaymentWithEntry]) -> f64 {
        records.iter().map(|row| row.payment.amount).sum()
    }

    /// Renders the rows as CSV text.
    ///
    /// Notes are wrapped in quotes without escaping embedded quotes, so a note containing
    /// `"` produces a malformed field. Existing exports depend on this exact shape.
    pub fn export_csv(records: &[PaymentWithEntry], dates: &dyn DateFormatter) -> String {
        let mut lines = Vec::with_capacity(records.len() + 1);
        lines.push(CSV_HEADER.to_string());
        for row in records {
            let payment = &row.payment;
            lines.push(format!(
                "{},{},{},\"{}\"",
                dates.format_date(payment.payment_day()),
                payment.amount,
                payment.method_label(),
                payment.notes.as_deref().unwrap_or("")
            ));
        }
        lines.join("\n")
    }
}

/// Month choices for the history selector, `all` first.
pub fn month_options() -> Vec<String> {
    std::iter::once("all".to_string())
        .chain(MONTH_NAMES.iter().map(|name| name.to_string()))
        .collect()
}

/// Years from `current_year - 5` through `current_year + 5`.
pub fn year_options(current_year: i32) -> Vec<i32> {
    ((current_year - YEAR_OPTION_SPAN)..=(current_year + YEAR_OPTION_SPAN)).collect()
}
