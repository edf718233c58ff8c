//! Field acquisition for the interactive operations. Each form asks for its
//! fields through a [`Prompter`] and returns validated values; nothing is
//! written until a form completes.

use chrono::NaiveDate;

use crate::{
    cli::{core::CliError, io::Prompter},
    domain::{parse_amount, parse_date, ExpenseRecord},
};

pub const DATE_PROMPT: &str = "Enter the date (YYYY-MM-DD) for the expense: ";
pub const CATEGORY_PROMPT: &str = "Enter category (e.g., Food, Transport, Bills): ";
pub const DESCRIPTION_PROMPT: &str = "Enter description: ";
pub const AMOUNT_PROMPT: &str = "Enter amount: ";
pub const DELETE_DATE_PROMPT: &str = "Enter the date (YYYY-MM-DD) of the expense to delete: ";
pub const DELETE_CATEGORY_PROMPT: &str = "Enter the category of the expense to delete: ";
pub const MONTH_PROMPT: &str = "Enter the month (MM): ";
pub const YEAR_PROMPT: &str = "Enter the year (YYYY): ";

/// Collects a new expense. When `date` is `None` the user is asked for one first.
pub fn expense_form(
    prompter: &mut dyn Prompter,
    date: Option<NaiveDate>,
) -> Result<ExpenseRecord, CliError> {
    let date = match date {
        Some(date) => date,
        None => parse_date(&prompter.ask(DATE_PROMPT)?)?,
    };
    let category = required(prompter, CATEGORY_PROMPT, "category")?;
    let description = prompter.ask(DESCRIPTION_PROMPT)?.trim().to_string();
    let amount = parse_amount(&prompter.ask(AMOUNT_PROMPT)?)?;
    Ok(ExpenseRecord::new(date, category, description, amount)?)
}

/// Date and category identifying the rows to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub date: NaiveDate,
    pub category: String,
}

pub fn delete_form(prompter: &mut dyn Prompter) -> Result<DeleteRequest, CliError> {
    let date = parse_date(&prompter.ask(DELETE_DATE_PROMPT)?)?;
    let category = required(prompter, DELETE_CATEGORY_PROMPT, "category")?;
    Ok(DeleteRequest { date, category })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

/// Asks for month then year, matching the order the totals report prints them.
pub fn month_form(prompter: &mut dyn Prompter) -> Result<MonthQuery, CliError> {
    let raw_month = prompter.ask(MONTH_PROMPT)?;
    let month = raw_month
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|month| (1..=12).contains(month))
        .ok_or_else(|| CliError::invalid(format!("`{}` is not a month (01-12)", raw_month.trim())))?;

    let raw_year = prompter.ask(YEAR_PROMPT)?;
    let year = raw_year
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|year| (1..=9999).contains(year))
        .ok_or_else(|| CliError::invalid(format!("`{}` is not a year (YYYY)", raw_year.trim())))?;

    Ok(MonthQuery { year, month })
}

fn required(prompter: &mut dyn Prompter, prompt: &str, field: &str) -> Result<String, CliError> {
    let value = prompter.ask(prompt)?.trim().to_string();
    if value.is_empty() {
        return Err(CliError::invalid(format!("{field} cannot be empty")));
    }
    Ok(value)
}
