use std::fmt;

use chrono::NaiveDate;

use crate::core::errors::{ExpenseError, Result};

/// Date format used both on disk and at the prompts.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header row written at the top of every expense file.
pub const HEADER: [&str; 4] = ["Date", "Category", "Description", "Amount"];

/// A single expense entry as stored in one row of the backing file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub category: String,
    pub description: String,
    pub amount: f64,
}

impl ExpenseRecord {
    /// Builds a record, rejecting negative or non-finite amounts.
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
    ) -> Result<Self> {
        validate_amount(amount)?;
        Ok(Self {
            date,
            category: category.into(),
            description: description.into(),
            amount,
        })
    }

    /// Parses the four raw fields of a stored row.
    pub fn from_fields(fields: &[&str]) -> Result<Self> {
        match fields {
            [date, category, description, amount] => Self::new(
                parse_date(date)?,
                *category,
                *description,
                parse_amount(amount)?,
            ),
            _ => Err(ExpenseError::invalid(format!(
                "expected {} fields, found {}",
                HEADER.len(),
                fields.len()
            ))),
        }
    }

    /// Row representation written to disk. Amounts use the shortest
    /// round-trip float form so reading them back is lossless.
    pub fn to_fields(&self) -> [String; 4] {
        [
            self.date.format(DATE_FORMAT).to_string(),
            self.category.clone(),
            self.description.clone(),
            self.amount.to_string(),
        ]
    }

    pub fn matches(&self, date: NaiveDate, category: &str) -> bool {
        self.date == date && same_category(&self.category, category)
    }
}

impl fmt::Display for ExpenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {:.2}",
            self.date.format(DATE_FORMAT),
            self.category,
            self.description,
            self.amount
        )
    }
}

/// Case-insensitive category comparison used when deleting.
pub fn same_category(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ExpenseError::invalid(format!("`{trimmed}` is not a YYYY-MM-DD date")))
}

/// Parses a non-negative decimal amount.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| ExpenseError::invalid(format!("`{trimmed}` is not a valid amount")))?;
    validate_amount(amount)?;
    Ok(amount)
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(ExpenseError::invalid("amount must be a finite number"));
    }
    if amount < 0.0 {
        return Err(ExpenseError::invalid("amount cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_valid_fields() {
        let record =
            ExpenseRecord::from_fields(&["2024-01-10", "Food", "Lunch", "250.75"]).unwrap();
        assert_eq!(record.date, date(2024, 1, 10));
        assert_eq!(record.category, "Food");
        assert_eq!(record.amount, 250.75);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = ExpenseRecord::from_fields(&["2024-01-10", "Food", "250"]).unwrap_err();
        assert!(err.to_string().contains("expected 4 fields"), "{err}");
    }

    #[test]
    fn rejects_bad_dates_and_amounts() {
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("10/01/2024").is_err());
        assert!(parse_amount("ten").is_err());
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("NaN").is_err());
        assert_eq!(parse_amount(" 12.5 ").unwrap(), 12.5);
    }

    #[test]
    fn amount_text_round_trips() {
        let record = ExpenseRecord::new(date(2024, 5, 1), "Bills", "Power", 0.1 + 0.2).unwrap();
        let fields = record.to_fields();
        let parsed: f64 = fields[3].parse().unwrap();
        assert_eq!(parsed, record.amount);
    }

    #[test]
    fn matches_category_case_insensitively() {
        let record = ExpenseRecord::new(date(2024, 5, 1), "Food", "Tea", 3.0).unwrap();
        assert!(record.matches(date(2024, 5, 1), "fOOD"));
        assert!(!record.matches(date(2024, 5, 2), "Food"));
    }
}
