//! rentmate-core
//!
//! Business rules and services for RentMate: rent status derivation, payment history
//! aggregation, validation, reminders, and the backend contract.
//! Depends on rentmate-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod auth_service;
pub mod backend;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod history;
pub mod payment_service;
pub mod reminders;
pub mod rent_service;
pub mod settings_service;
pub mod status;
pub mod time;
pub mod validation;

pub use auth_service::AuthService;
pub use backend::RentBackend;
pub use context::{AuthContext, ThemeContext, ThemeSource};
pub use dashboard::{DashboardCard, DashboardView, PaymentIndex};
pub use error::CoreError;
pub use history::{CalendarMonth, HistoryAggregator, HistoryFilter, HistorySummary, MonthFilter};
pub use payment_service::{PaymentService, MARK_PAID_NOTE};
pub use reminders::{PlannedReminder, ReminderChannel, ReminderPlanner};
pub use rent_service::{RentService, LOAD_FAILED_MESSAGE};
pub use settings_service::SettingsService;
pub use status::{RentStatus, StatusDeriver, StatusReport};
pub use time::{Clock, FixedClock, SystemClock};

#[cfg(test)]
mod tests;
