//! rentmate-domain
//!
//! Pure domain models (RentEntry, PaymentRecord, UserSettings, Session).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod payment;
pub mod rent_entry;
pub mod session;
pub mod settings;

pub use common::*;
pub use payment::*;
pub use rent_entry::*;
pub use session::*;
pub use settings::*;
