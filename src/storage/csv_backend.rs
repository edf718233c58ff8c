use chrono::NaiveDate;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use crate::{
    core::{errors::ExpenseError, utils::ensure_dir},
    domain::{ExpenseRecord, HEADER},
};

use super::{CorruptRow, DeleteOutcome, ExpenseStore, Result, StoreSnapshot};

const TMP_SUFFIX: &str = "tmp";

/// Expense store backed by a single comma-delimited file.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn unavailable(&self, err: io::Error) -> ExpenseError {
        ExpenseError::storage(&self.path, err)
    }

    fn csv_unavailable(&self, err: csv::Error) -> ExpenseError {
        self.unavailable(io::Error::from(err))
    }

    fn open_existing(&self) -> Result<File> {
        File::open(&self.path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ExpenseError::StoreEmpty,
            _ => self.unavailable(err),
        })
    }

    fn rewrite(&self, header: &csv::ByteRecord, rows: &[csv::ByteRecord]) -> Result<()> {
        let tmp = tmp_path(&self.path);
        {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_path(&tmp)
                .map_err(|err| self.csv_unavailable(err))?;
            writer
                .write_byte_record(header)
                .map_err(|err| self.csv_unavailable(err))?;
            for row in rows {
                writer
                    .write_byte_record(row)
                    .map_err(|err| self.csv_unavailable(err))?;
            }
            writer.flush().map_err(|err| self.unavailable(err))?;
        }
        fs::rename(&tmp, &self.path).map_err(|err| self.unavailable(err))?;
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "expense file rewritten");
        Ok(())
    }

    fn write_header(&self, file: &mut File) -> Result<()> {
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(HEADER)
            .map_err(|err| self.csv_unavailable(err))?;
        writer.flush().map_err(|err| self.unavailable(err))
    }

    /// Leaves `file` ready for a new row at its end: a header when the file is
    /// empty, a line break when the last row lacks one.
    fn prepare_for_append(&self, file: &mut File) -> Result<()> {
        let len = file.metadata().map_err(|err| self.unavailable(err))?.len();
        if len == 0 {
            return self.write_header(file);
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1))
            .and_then(|_| file.read_exact(&mut last))
            .map_err(|err| self.unavailable(err))?;
        if last[0] != b'\n' {
            file.write_all(b"\n").map_err(|err| self.unavailable(err))?;
        }
        Ok(())
    }
}

impl ExpenseStore for CsvStore {
    fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(mut file) => {
                self.write_header(&mut file)?;
                tracing::info!(path = %self.path.display(), "created expense file");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                let mut file = OpenOptions::new()
                    .append(true)
                    .open(&self.path)
                    .map_err(|err| self.unavailable(err))?;
                let len = file.metadata().map_err(|err| self.unavailable(err))?.len();
                if len == 0 {
                    self.write_header(&mut file)?;
                    tracing::info!(path = %self.path.display(), "wrote header to empty expense file");
                }
                Ok(())
            }
            Err(err) => Err(self.unavailable(err)),
        }
    }

    fn append(&self, record: &ExpenseRecord) -> Result<()> {
        if !self.path.exists() {
            self.initialize()?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| self.unavailable(err))?;
        self.prepare_for_append(&mut file)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(&record.to_fields())
            .map_err(|err| self.csv_unavailable(err))?;
        writer.flush().map_err(|err| self.unavailable(err))?;
        tracing::debug!(date = %record.date, category = %record.category, "expense appended");
        Ok(())
    }

    fn read_all(&self) -> Result<StoreSnapshot> {
        let file = self.open_existing()?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut snapshot = StoreSnapshot::default();
        for (index, result) in reader.records().enumerate() {
            let row = match result {
                Ok(row) => row,
                Err(err) => {
                    if let csv::ErrorKind::Utf8 { pos, err: utf8 } = err.kind() {
                        let line = pos.as_ref().map(|p| p.line()).unwrap_or_default();
                        snapshot.corrupt.push(CorruptRow {
                            line,
                            reason: format!("invalid UTF-8: {utf8}"),
                        });
                        continue;
                    }
                    return Err(self.csv_unavailable(err));
                }
            };

            let fields: Vec<&str> = row.iter().collect();
            // A file without a header still has its first line read as data.
            if index == 0 && is_header(&fields) {
                continue;
            }
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            match ExpenseRecord::from_fields(&fields) {
                Ok(record) => snapshot.records.push(record),
                Err(err) => snapshot.corrupt.push(CorruptRow {
                    line,
                    reason: corrupt_reason(err),
                }),
            }
        }

        for row in &snapshot.corrupt {
            tracing::warn!(path = %self.path.display(), line = row.line, reason = %row.reason, "skipping corrupt expense row");
        }
        Ok(snapshot)
    }

    fn delete_matching(&self, date: NaiveDate, category: &str) -> Result<DeleteOutcome> {
        let file = self.open_existing()?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let header = csv::ByteRecord::from(HEADER.to_vec());
        let mut survivors = Vec::new();
        let mut removed = 0;
        for (index, row) in reader.byte_records().enumerate() {
            let row = row.map_err(|err| self.csv_unavailable(err))?;
            if index == 0 && is_header_bytes(&row) {
                continue;
            }
            if row_matches(&row, date, category) {
                removed += 1;
            } else {
                survivors.push(row);
            }
        }

        if removed == 0 {
            return Ok(DeleteOutcome::NoMatch);
        }
        self.rewrite(&header, &survivors)?;
        tracing::info!(%date, category, removed, "expenses deleted");
        Ok(DeleteOutcome::Removed(removed))
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

fn is_header(fields: &[&str]) -> bool {
    fields.len() == HEADER.len()
        && fields
            .iter()
            .zip(HEADER)
            .all(|(field, name)| field.trim() == name)
}

fn is_header_bytes(row: &csv::ByteRecord) -> bool {
    let fields: Option<Vec<&str>> = row
        .iter()
        .map(|raw| std::str::from_utf8(raw).ok())
        .collect();
    fields.is_some_and(|fields| is_header(&fields))
}

/// Only rows that parse as a full record can match; corrupt rows always survive.
fn row_matches(row: &csv::ByteRecord, date: NaiveDate, category: &str) -> bool {
    let fields: Option<Vec<&str>> = row
        .iter()
        .map(|raw| std::str::from_utf8(raw).ok())
        .collect();
    fields
        .and_then(|fields| ExpenseRecord::from_fields(&fields).ok())
        .is_some_and(|record| record.matches(date, category))
}

fn corrupt_reason(err: ExpenseError) -> String {
    match err {
        ExpenseError::InvalidInput(message) => message,
        other => other.to_string(),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::SummaryService;
    use tempfile::TempDir;

    fn store_in_temp_dir() -> (CsvStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = CsvStore::new(temp.path().join("expense.csv"));
        store.initialize().expect("initialize store");
        (store, temp)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(day: NaiveDate, category: &str, description: &str, amount: f64) -> ExpenseRecord {
        ExpenseRecord::new(day, category, description, amount).unwrap()
    }

    #[test]
    fn initialize_writes_header_once() {
        let (store, _guard) = store_in_temp_dir();
        store.initialize().expect("second initialize is a no-op");
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "Date,Category,Description,Amount\n");
    }

    #[test]
    fn initialize_reports_unavailable_storage() {
        let temp = TempDir::new().expect("temp dir");
        let blocker = temp.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();
        let store = CsvStore::new(blocker.join("expense.csv"));
        let err = store.initialize().expect_err("parent is a file");
        assert!(matches!(err, ExpenseError::StorageUnavailable { .. }), "{err}");
    }

    #[test]
    fn read_all_on_missing_file_is_store_empty() {
        let temp = TempDir::new().expect("temp dir");
        let store = CsvStore::new(temp.path().join("missing.csv"));
        let err = store.read_all().expect_err("no file yet");
        assert!(err.is_store_empty());
    }

    #[test]
    fn appended_records_read_back_in_order() {
        let (store, _guard) = store_in_temp_dir();
        let written = vec![
            record(date(2024, 1, 10), "Food", "Lunch", 250.0),
            record(date(2024, 1, 11), "Transport", "Bus, return", 12.345),
            record(date(2024, 1, 12), "Bills", "Say \"hi\"", 0.1 + 0.2),
            record(date(2024, 1, 12), "Food", "Lunch", 250.0),
        ];
        for expense in &written {
            store.append(expense).expect("append");
        }

        let snapshot = store.read_all().expect("read all");
        assert!(snapshot.corrupt.is_empty());
        assert_eq!(snapshot.records, written);
    }

    #[test]
    fn append_creates_missing_file_with_header() {
        let temp = TempDir::new().expect("temp dir");
        let store = CsvStore::new(temp.path().join("fresh.csv"));
        store
            .append(&record(date(2024, 2, 1), "Food", "Snack", 5.0))
            .expect("append");
        let snapshot = store.read_all().expect("read all");
        assert_eq!(snapshot.records.len(), 1);
    }

    #[test]
    fn corrupt_rows_are_reported_and_skipped() {
        let (store, _guard) = store_in_temp_dir();
        let mut contents = fs::read_to_string(store.path()).unwrap();
        contents.push_str("2024-01-10,Food,Lunch,250\n");
        contents.push_str("not-a-date,Food,Lunch,10\n");
        contents.push_str("2024-01-11,Food,Lunch,ten\n");
        contents.push_str("2024-01-12,Food,100\n");
        contents.push_str("2024-01-13,Food,Dinner,150\n");
        fs::write(store.path(), contents).unwrap();

        let snapshot = store.read_all().expect("read all");
        assert_eq!(snapshot.records.len(), 2);
        let lines: Vec<u64> = snapshot.corrupt.iter().map(|row| row.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert_eq!(
            SummaryService::total_by_category(&snapshot.records).get("Food"),
            Some(400.0)
        );
    }

    #[test]
    fn delete_removes_matches_and_keeps_order() {
        let (store, _guard) = store_in_temp_dir();
        store
            .append(&record(date(2024, 1, 10), "Food", "Lunch", 250.0))
            .unwrap();
        store
            .append(&record(date(2024, 1, 10), "Bills", "Water", 40.0))
            .unwrap();
        store
            .append(&record(date(2024, 1, 11), "Food", "Dinner", 150.0))
            .unwrap();

        let outcome = store
            .delete_matching(date(2024, 1, 10), " food ")
            .expect("delete");
        assert_eq!(outcome, DeleteOutcome::Removed(1));

        let remaining = store.read_all().unwrap().records;
        let descriptions: Vec<&str> = remaining.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Water", "Dinner"]);

        let again = store
            .delete_matching(date(2024, 1, 10), "Food")
            .expect("delete again");
        assert_eq!(again, DeleteOutcome::NoMatch);
        assert!(!tmp_path(store.path()).exists());
    }

    #[test]
    fn delete_preserves_corrupt_rows_verbatim() {
        let (store, _guard) = store_in_temp_dir();
        let mut contents = fs::read_to_string(store.path()).unwrap();
        contents.push_str("2024-01-10,Food,Lunch,250\n");
        contents.push_str("garbage,row\n");
        fs::write(store.path(), contents).unwrap();

        store.delete_matching(date(2024, 1, 10), "FOOD").unwrap();
        let rewritten = fs::read_to_string(store.path()).unwrap();
        assert_eq!(rewritten, "Date,Category,Description,Amount\ngarbage,row\n");
    }

    #[test]
    fn empty_existing_file_gets_a_header_before_the_first_record() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("expense.csv");
        fs::write(&path, "").unwrap();
        let store = CsvStore::new(&path);

        store.initialize().expect("initialize empty file");
        store
            .append(&record(date(2024, 1, 11), "Food", "Dinner", 150.0))
            .expect("append");

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Date,Category,Description,Amount\n2024-01-11,Food,Dinner,150\n"
        );
        let snapshot = store.read_all().expect("read all");
        assert_eq!(snapshot.records.len(), 1);
        assert!(snapshot.corrupt.is_empty());
    }

    #[test]
    fn append_to_empty_file_writes_header() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("expense.csv");
        fs::write(&path, "").unwrap();
        let store = CsvStore::new(&path);

        store
            .append(&record(date(2024, 1, 11), "Food", "Dinner", 150.0))
            .expect("append");
        assert_eq!(store.read_all().unwrap().records.len(), 1);
    }

    #[test]
    fn headerless_file_keeps_its_first_row() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("expense.csv");
        fs::write(&path, "2024-01-10,Food,Lunch,250\n2024-01-11,Food,Dinner,150\n").unwrap();
        let store = CsvStore::new(&path);

        let snapshot = store.read_all().expect("read all");
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.records[0].description, "Lunch");

        store.delete_matching(date(2024, 1, 11), "food").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Date,Category,Description,Amount\n2024-01-10,Food,Lunch,250\n"
        );
    }

    #[test]
    fn append_starts_a_new_line_after_an_unterminated_row() {
        let (store, _guard) = store_in_temp_dir();
        let mut contents = fs::read_to_string(store.path()).unwrap();
        contents.push_str("2024-01-10,Food,Lunch,250");
        fs::write(store.path(), contents).unwrap();

        store
            .append(&record(date(2024, 1, 11), "Food", "Dinner", 150.0))
            .expect("append");

        let snapshot = store.read_all().expect("read all");
        assert!(snapshot.corrupt.is_empty(), "{:?}", snapshot.corrupt);
        let descriptions: Vec<&str> = snapshot
            .records
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Lunch", "Dinner"]);
    }

    #[test]
    fn delete_never_removes_corrupt_rows_that_look_like_matches() {
        let (store, _guard) = store_in_temp_dir();
        let mut contents = fs::read_to_string(store.path()).unwrap();
        contents.push_str("2024-01-10,Food,ten\n");
        contents.push_str("2024-01-10,Food,Lunch,abc\n");
        fs::write(store.path(), &contents).unwrap();

        let outcome = store.delete_matching(date(2024, 1, 10), "food").unwrap();
        assert_eq!(outcome, DeleteOutcome::NoMatch);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), contents);

        store
            .append(&record(date(2024, 1, 10), "Food", "Tea", 3.0))
            .unwrap();
        let outcome = store.delete_matching(date(2024, 1, 10), "food").unwrap();
        assert_eq!(outcome, DeleteOutcome::Removed(1));
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "Date,Category,Description,Amount\n2024-01-10,Food,ten\n2024-01-10,Food,Lunch,abc\n"
        );
    }

    #[test]
    fn delete_on_missing_file_is_store_empty() {
        let temp = TempDir::new().expect("temp dir");
        let store = CsvStore::new(temp.path().join("missing.csv"));
        let err = store
            .delete_matching(date(2024, 1, 1), "Food")
            .expect_err("no file");
        assert!(err.is_store_empty());
    }

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("data/expense.csv")),
            PathBuf::from("data/expense.csv.tmp")
        );
    }
}
