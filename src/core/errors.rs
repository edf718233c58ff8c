use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Unified error type for the domain, storage and configuration layers.
#[derive(Error, Debug)]
pub enum ExpenseError {
    #[error("Storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No expenses recorded yet")]
    StoreEmpty,
    #[error("Corrupt record on line {line}: {reason}")]
    CorruptRecord { line: u64, reason: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, ExpenseError>;

impl ExpenseError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExpenseError::StorageUnavailable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ExpenseError::InvalidInput(message.into())
    }

    /// Whether the error is the informational "no data yet" signal.
    pub fn is_store_empty(&self) -> bool {
        matches!(self, ExpenseError::StoreEmpty)
    }
}

impl From<serde_json::Error> for ExpenseError {
    fn from(err: serde_json::Error) -> Self {
        ExpenseError::Config(err.to_string())
    }
}
