use std::path::Path;

use assert_cmd::Command;
use chrono::NaiveDate;
use expense_tracker::ExpenseRecord;

/// The binary in script mode, isolated to `home` and writing to `data_file`.
pub fn script_command(home: &Path, data_file: &Path) -> Command {
    let mut cmd = Command::cargo_bin("expense_tracker").expect("expense_tracker binary");
    cmd.env("EXPENSE_TRACKER_CLI_SCRIPT", "1")
        .env("EXPENSE_TRACKER_HOME", home)
        .env("EXPENSE_TRACKER_FILE", data_file)
        .env_remove("RUST_LOG");
    cmd
}

#[allow(dead_code)]
pub fn expense(date: &str, category: &str, description: &str, amount: f64) -> ExpenseRecord {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("test date");
    ExpenseRecord::new(date, category, description, amount).expect("test record")
}
