pub mod expense;

pub use expense::{
    parse_amount, parse_date, same_category, ExpenseRecord, DATE_FORMAT, HEADER,
};
