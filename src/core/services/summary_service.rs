use chrono::{Datelike, NaiveDate};

use crate::domain::ExpenseRecord;

/// Ordered label to amount mapping produced by the aggregations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    entries: Vec<(String, f64)>,
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the bucket for `label`, creating it at the end if new.
    pub fn add(&mut self, label: &str, amount: f64) {
        match self.entries.iter_mut().find(|(key, _)| key == label) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((label.to_string(), amount)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, total)| *total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(label, total)| (label.as_str(), *total))
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, total)| total).sum()
    }

    pub fn max_value(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, total)| *total)
            .fold(0.0, f64::max)
    }

    /// Returns the buckets ordered by label.
    pub fn sorted(mut self) -> Self {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}

impl<'a> FromIterator<(&'a str, f64)> for Buckets {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut buckets = Buckets::new();
        for (label, amount) in iter {
            buckets.add(label, amount);
        }
        buckets
    }
}

/// One row of the per-category report.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLine {
    pub category: String,
    pub count: usize,
    pub total: f64,
    /// Percentage of the grand total, 0.0 when everything sums to zero.
    pub share: f64,
}

/// Pure aggregations over a full record sequence.
pub struct SummaryService;

impl SummaryService {
    /// Category totals in order of first appearance.
    pub fn total_by_category(records: &[ExpenseRecord]) -> Buckets {
        records
            .iter()
            .map(|record| (record.category.as_str(), record.amount))
            .collect()
    }

    /// Sum of every record dated in the given year and month; zero when none match.
    pub fn total_for_month(records: &[ExpenseRecord], year: i32, month: u32) -> f64 {
        records
            .iter()
            .filter(|record| record.date.year() == year && record.date.month() == month)
            .map(|record| record.amount)
            .sum()
    }

    /// The record with the largest amount, ties going to the earliest one.
    pub fn max_expense(records: &[ExpenseRecord]) -> Option<&ExpenseRecord> {
        records.iter().fold(None, |best, record| match best {
            Some(current) if current.amount >= record.amount => Some(current),
            _ => Some(record),
        })
    }

    /// Totals keyed `YYYY-MM`, in chronological order.
    pub fn total_by_month(records: &[ExpenseRecord]) -> Buckets {
        let mut buckets = Buckets::new();
        for record in records {
            buckets.add(&month_key(record.date), record.amount);
        }
        buckets.sorted()
    }

    /// Totals keyed `YYYY-Www` by ISO-8601 week, in chronological order.
    pub fn total_by_week(records: &[ExpenseRecord]) -> Buckets {
        let mut buckets = Buckets::new();
        for record in records {
            buckets.add(&week_key(record.date), record.amount);
        }
        buckets.sorted()
    }

    pub fn grand_total(records: &[ExpenseRecord]) -> f64 {
        records.iter().map(|record| record.amount).sum()
    }

    pub fn category_report(records: &[ExpenseRecord]) -> Vec<CategoryLine> {
        let grand_total = Self::grand_total(records);
        let mut lines: Vec<CategoryLine> = Vec::new();
        for record in records {
            match lines.iter_mut().find(|line| line.category == record.category) {
                Some(line) => {
                    line.count += 1;
                    line.total += record.amount;
                }
                None => lines.push(CategoryLine {
                    category: record.category.clone(),
                    count: 1,
                    total: record.amount,
                    share: 0.0,
                }),
            }
        }
        if grand_total > 0.0 {
            for line in &mut lines {
                line.share = line.total / grand_total * 100.0;
            }
        }
        lines
    }
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// ISO week key; the year is the ISO week-numbering year, so 2024-12-30 is `2025-W01`.
pub fn week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(day: NaiveDate, category: &str, description: &str, amount: f64) -> ExpenseRecord {
        ExpenseRecord::new(day, category, description, amount).unwrap()
    }

    #[test]
    fn food_scenario_accumulates_per_category_and_month() {
        let mut records = vec![expense(date(2024, 1, 10), "Food", "Lunch", 250.00)];
        let totals = SummaryService::total_by_category(&records);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals.get("Food"), Some(250.00));

        records.push(expense(date(2024, 1, 15), "Food", "Dinner", 150.00));
        let totals = SummaryService::total_by_category(&records);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals.get("Food"), Some(400.00));

        let months = SummaryService::total_by_month(&records);
        assert_eq!(months.len(), 1);
        assert_eq!(months.get("2024-01"), Some(400.00));
    }

    #[test]
    fn category_totals_keep_first_appearance_order() {
        let records = vec![
            expense(date(2024, 3, 1), "Transport", "Bus", 2.5),
            expense(date(2024, 3, 1), "Food", "Tea", 1.0),
            expense(date(2024, 3, 2), "Transport", "Taxi", 20.0),
        ];
        let totals = SummaryService::total_by_category(&records);
        assert_eq!(totals.labels(), vec!["Transport", "Food"]);
        assert_eq!(totals.get("Transport"), Some(22.5));
        assert_eq!(totals.total(), 23.5);
    }

    #[test]
    fn month_total_filters_on_year_and_month() {
        let records = vec![
            expense(date(2024, 5, 1), "Food", "a", 10.0),
            expense(date(2024, 5, 31), "Bills", "b", 5.5),
            expense(date(2023, 5, 10), "Food", "c", 100.0),
            expense(date(2024, 6, 1), "Food", "d", 7.0),
        ];
        assert_eq!(SummaryService::total_for_month(&records, 2024, 5), 15.5);
        assert_eq!(SummaryService::total_for_month(&records, 2022, 1), 0.0);
        assert_eq!(SummaryService::total_for_month(&[], 2024, 5), 0.0);
    }

    #[test]
    fn max_expense_prefers_first_of_equal_amounts() {
        let records = vec![
            expense(date(2024, 1, 1), "A", "ten", 10.0),
            expense(date(2024, 1, 2), "B", "first fifty", 50.0),
            expense(date(2024, 1, 3), "C", "second fifty", 50.0),
        ];
        let max = SummaryService::max_expense(&records).expect("non-empty");
        assert_eq!(max.description, "first fifty");
        assert!(SummaryService::max_expense(&[]).is_none());
    }

    #[test]
    fn weeks_use_iso_numbering() {
        let records = vec![
            expense(date(2024, 12, 30), "Food", "x", 1.0),
            expense(date(2025, 1, 5), "Food", "y", 2.0),
            expense(date(2024, 1, 1), "Food", "z", 4.0),
            expense(date(2024, 1, 7), "Food", "w", 8.0),
            expense(date(2024, 1, 8), "Food", "v", 16.0),
        ];
        let weeks = SummaryService::total_by_week(&records);
        assert_eq!(weeks.labels(), vec!["2024-W01", "2024-W02", "2025-W01"]);
        assert_eq!(weeks.get("2024-W01"), Some(12.0));
        assert_eq!(weeks.get("2025-W01"), Some(3.0));
    }

    #[test]
    fn month_buckets_are_sorted() {
        let records = vec![
            expense(date(2024, 3, 1), "Food", "x", 1.0),
            expense(date(2023, 12, 1), "Food", "y", 2.0),
            expense(date(2024, 3, 9), "Food", "z", 3.0),
        ];
        let months = SummaryService::total_by_month(&records);
        assert_eq!(months.labels(), vec!["2023-12", "2024-03"]);
        assert_eq!(months.get("2024-03"), Some(4.0));
    }

    #[test]
    fn category_report_counts_and_shares() {
        let records = vec![
            expense(date(2024, 1, 1), "Food", "a", 30.0),
            expense(date(2024, 1, 2), "Bills", "b", 50.0),
            expense(date(2024, 1, 3), "Food", "c", 20.0),
        ];
        let report = SummaryService::category_report(&records);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].category, "Food");
        assert_eq!(report[0].count, 2);
        assert_eq!(report[0].total, 50.0);
        assert_eq!(report[0].share, 50.0);
        assert!(SummaryService::category_report(&[]).is_empty());
    }

    #[test]
    fn zero_amounts_have_zero_share() {
        let records = vec![expense(date(2024, 1, 1), "Gifts", "free", 0.0)];
        let report = SummaryService::category_report(&records);
        assert_eq!(report[0].share, 0.0);
    }
}
