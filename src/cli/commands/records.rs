use crate::cli::core::{CommandResult, LoopControl};
use crate::cli::forms;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::ui::{Table, TableColumn};
use crate::core::services::SummaryService;
use crate::domain::DATE_FORMAT;
use crate::storage::DeleteOutcome;

use super::NO_EXPENSES;

const DESCRIPTION_WIDTH: usize = 40;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(1, "add-today", "Add today's expense", cmd_add_today),
        CommandEntry::new(
            2,
            "add-for-date",
            "Add expense for a specific date",
            cmd_add_for_date,
        ),
        CommandEntry::new(3, "view-all", "View expenses", cmd_view_all),
        CommandEntry::new(11, "delete", "Delete an expense", cmd_delete),
    ]
}

fn cmd_add_today(context: &mut ShellContext) -> CommandResult {
    let today = context.clock.today();
    let record = forms::expense_form(context.prompter.as_mut(), Some(today))?;
    context.store.append(&record)?;
    output::success("Expense added successfully!");
    Ok(LoopControl::Continue)
}

fn cmd_add_for_date(context: &mut ShellContext) -> CommandResult {
    let record = forms::expense_form(context.prompter.as_mut(), None)?;
    context.store.append(&record)?;
    output::success("Expense added successfully for the specified date!");
    Ok(LoopControl::Continue)
}

fn cmd_view_all(context: &mut ShellContext) -> CommandResult {
    let records = context.load_records()?;
    if records.is_empty() {
        output::info(NO_EXPENSES);
        return Ok(LoopControl::Continue);
    }

    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::left("Category"),
        TableColumn::left("Description").max_width(DESCRIPTION_WIDTH),
        TableColumn::right("Amount"),
    ]);
    for record in &records {
        table.push_row(vec![
            record.date.format(DATE_FORMAT).to_string(),
            record.category.clone(),
            record.description.clone(),
            context.money(record.amount),
        ]);
    }
    table.set_footer(vec![
        format!("{} entries", records.len()),
        String::new(),
        "Total".into(),
        context.money(SummaryService::grand_total(&records)),
    ]);

    output::section("Expenses");
    output::info(table.render());
    Ok(LoopControl::Continue)
}

fn cmd_delete(context: &mut ShellContext) -> CommandResult {
    let request = forms::delete_form(context.prompter.as_mut())?;
    match context.store.delete_matching(request.date, &request.category)? {
        DeleteOutcome::Removed(count) => {
            output::success(format!("Expense(s) deleted successfully! ({count} removed)"));
        }
        DeleteOutcome::NoMatch => output::warning("No matching expense found to delete."),
    }
    Ok(LoopControl::Continue)
}
