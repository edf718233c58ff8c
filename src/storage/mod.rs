pub mod csv_backend;

use std::{fmt, path::Path};

use chrono::NaiveDate;

use crate::{core::errors::ExpenseError, domain::ExpenseRecord};

pub type Result<T> = std::result::Result<T, ExpenseError>;

/// Abstraction over the persisted, ordered collection of expense records.
pub trait ExpenseStore {
    /// Ensures the backing file exists and carries the header row.
    fn initialize(&self) -> Result<()>;
    /// Appends one record after every existing row.
    fn append(&self, record: &ExpenseRecord) -> Result<()>;
    /// Reads every row, separating valid records from corrupt ones.
    fn read_all(&self) -> Result<StoreSnapshot>;
    /// Removes every row with the given date and category (case-insensitive).
    fn delete_matching(&self, date: NaiveDate, category: &str) -> Result<DeleteOutcome>;
    fn path(&self) -> &Path;
}

/// Result of a full scan: valid records in file order plus the rows that failed to parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub records: Vec<ExpenseRecord>,
    pub corrupt: Vec<CorruptRow>,
}

impl StoreSnapshot {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A row that could not be turned into an [`ExpenseRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptRow {
    /// 1-based line in the backing file.
    pub line: u64,
    pub reason: String,
}

impl CorruptRow {
    pub fn to_error(&self) -> ExpenseError {
        ExpenseError::CorruptRecord {
            line: self.line,
            reason: self.reason.clone(),
        }
    }
}

impl fmt::Display for CorruptRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed(usize),
    NoMatch,
}

pub use csv_backend::CsvStore;
