use crate::cli::core::{CliError, CommandResult, LoopControl};
use crate::cli::forms;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::cli::ui::{Chart, Table, TableColumn};
use crate::core::services::{Buckets, SummaryService};
use crate::domain::{ExpenseRecord, DATE_FORMAT};

use super::NO_EXPENSES;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            4,
            "analyze-by-category",
            "Analyze expenses by category",
            cmd_analyze,
        ),
        CommandEntry::new(5, "month-total", "Total monthly spending", cmd_month_total),
        CommandEntry::new(6, "highest-expense", "Highest expense", cmd_highest),
        CommandEntry::new(
            7,
            "category-report",
            "Spending report by category",
            cmd_category_report,
        ),
        CommandEntry::new(
            8,
            "pie-chart",
            "Spending distribution (pie chart)",
            cmd_pie_chart,
        ),
        CommandEntry::new(
            9,
            "monthly-bar-chart",
            "Monthly spending (bar chart)",
            cmd_monthly_chart,
        ),
        CommandEntry::new(
            10,
            "weekly-bar-chart",
            "Weekly spending (bar chart)",
            cmd_weekly_chart,
        ),
    ]
}

/// Loads records, printing the "no data" notice when there are none.
fn records_or_notice(context: &ShellContext) -> Result<Option<Vec<ExpenseRecord>>, CliError> {
    let records = context.load_records()?;
    if records.is_empty() {
        output::info(NO_EXPENSES);
        return Ok(None);
    }
    Ok(Some(records))
}

fn cmd_analyze(context: &mut ShellContext) -> CommandResult {
    let Some(records) = records_or_notice(context)? else {
        return Ok(LoopControl::Continue);
    };
    output::section("Expense Analysis by Category");
    for (category, total) in SummaryService::total_by_category(&records).iter() {
        output::info(format!("{category}: {}", context.money(total)));
    }
    Ok(LoopControl::Continue)
}

fn cmd_month_total(context: &mut ShellContext) -> CommandResult {
    let query = forms::month_form(context.prompter.as_mut())?;
    let records = context.load_records()?;
    let total = SummaryService::total_for_month(&records, query.year, query.month);
    output::info(format!(
        "Total spending for {:02}/{:04}: {}",
        query.month,
        query.year,
        context.money(total)
    ));
    Ok(LoopControl::Continue)
}

fn cmd_highest(context: &mut ShellContext) -> CommandResult {
    let records = context.load_records()?;
    let Some(record) = SummaryService::max_expense(&records) else {
        output::info(NO_EXPENSES);
        return Ok(LoopControl::Continue);
    };
    output::section("Highest Expense");
    output::info(format!("Date: {}", record.date.format(DATE_FORMAT)));
    output::info(format!("Category: {}", record.category));
    output::info(format!("Description: {}", record.description));
    output::info(format!("Amount: {}", context.money(record.amount)));
    Ok(LoopControl::Continue)
}

fn cmd_category_report(context: &mut ShellContext) -> CommandResult {
    let Some(records) = records_or_notice(context)? else {
        return Ok(LoopControl::Continue);
    };

    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Entries"),
        TableColumn::right("Total"),
        TableColumn::right("Share"),
    ]);
    for line in SummaryService::category_report(&records) {
        table.push_row(vec![
            line.category,
            line.count.to_string(),
            context.money(line.total),
            format!("{:.1}%", line.share),
        ]);
    }
    table.set_footer(vec![
        "All".into(),
        records.len().to_string(),
        context.money(SummaryService::grand_total(&records)),
        String::new(),
    ]);

    output::section("Spending by Category");
    output::info(table.render());
    Ok(LoopControl::Continue)
}

fn cmd_pie_chart(context: &mut ShellContext) -> CommandResult {
    let Some(records) = records_or_notice(context)? else {
        return Ok(LoopControl::Continue);
    };
    let chart = Chart::pie(
        "Spending Distribution by Category",
        SummaryService::total_by_category(&records),
    );
    context.renderer.render(&chart)?;
    Ok(LoopControl::Continue)
}

fn cmd_monthly_chart(context: &mut ShellContext) -> CommandResult {
    let Some(records) = records_or_notice(context)? else {
        return Ok(LoopControl::Continue);
    };
    draw_bar_chart(
        context,
        "Monthly Spending",
        "Month-Year",
        SummaryService::total_by_month(&records),
    )
}

fn cmd_weekly_chart(context: &mut ShellContext) -> CommandResult {
    let Some(records) = records_or_notice(context)? else {
        return Ok(LoopControl::Continue);
    };
    draw_bar_chart(
        context,
        "Weekly Spending",
        "Week-Year (ISO)",
        SummaryService::total_by_week(&records),
    )
}

fn draw_bar_chart(
    context: &mut ShellContext,
    title: &str,
    x_label: &str,
    series: Buckets,
) -> CommandResult {
    let y_label = format!("Total Spending ({})", context.config.currency_label.trim());
    let chart = Chart::bar(title, x_label, y_label, series);
    context.renderer.render(&chart)?;
    Ok(LoopControl::Continue)
}
