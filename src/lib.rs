#![doc(test(attr(deny(warnings))))]

//! Expense Tracker keeps personal expenses in a single CSV file and reports on
//! them by category, month and ISO week from an interactive numbered menu.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod storage;
pub mod utils;

pub use crate::core::errors::{ExpenseError, Result};
pub use crate::core::services::{Buckets, SummaryService};
pub use domain::ExpenseRecord;
pub use storage::{CsvStore, DeleteOutcome, ExpenseStore, StoreSnapshot};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense tracker tracing initialized.");
    });
}
