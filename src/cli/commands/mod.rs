pub mod records;
pub mod reports;
pub mod system;

use crate::cli::registry::CommandEntry;

pub const NO_EXPENSES: &str = "No expenses found. Add some expenses first.";

/// Every menu entry, in menu order.
pub(crate) fn definitions() -> Vec<CommandEntry> {
    let mut entries = records::definitions();
    entries.extend(reports::definitions());
    entries.extend(system::definitions());
    entries.sort_by_key(|entry| entry.number);
    entries
}
