#![doc(test(attr(deny(warnings))))]

//! RentMate keeps track of rent due dates and the payments made against them.
//!
//! The library exposes the interactive shell used by the `rentmate_cli` binary; the
//! business rules live in `rentmate-core` and storage in `rentmate-storage-json`.

pub mod cli;
pub mod errors;
pub mod utils;

pub use errors::{CliError, RentError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("RentMate tracing initialized.");
    });
}
