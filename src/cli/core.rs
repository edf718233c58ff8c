use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::core::errors::ExpenseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Failures surfaced by the shell and its command handlers.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ExpenseError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("Operation cancelled")]
    Cancelled,
    #[error("End of input")]
    EndOfInput,
}

impl CliError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CliError::Core(ExpenseError::InvalidInput(message.into()))
    }
}

pub type CommandResult = Result<LoopControl, CliError>;
