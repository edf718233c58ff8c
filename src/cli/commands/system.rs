use crate::cli::core::{CommandResult, LoopControl};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

pub const EXIT_MESSAGE: &str = "Exiting Expense Tracker. Goodbye!";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(12, "exit", "Exit", cmd_exit)]
}

fn cmd_exit(_context: &mut ShellContext) -> CommandResult {
    output::info(EXIT_MESSAGE);
    Ok(LoopControl::Exit)
}
