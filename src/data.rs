use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Column names of the table, in file order. Always the first line of the store.
pub const HEADER: [&str; 3] = ["date", "amount", "category"];

/// Canonical textual form of a record date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One expense entry. Field order matters: it is the column order of the table,
/// and rows are (de)serialized positionally.
///
/// The `amount` keeps the scale it was entered with (`42.50` stays `42.50`),
/// which is why the crate uses the `serde-str` flavour of `rust_decimal`.
/// The `category` is free text taken verbatim, the empty string included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Record {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
}

/// Year-month key used to group records for the monthly total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Strict `YYYY-MM`, parsed as the first day of that month.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let first = NaiveDate::parse_from_str(&format!("{s}-01"), DATE_FORMAT)
            .map_err(|_| Error::InvalidMonthFormat(s.to_owned()))?;
        Ok(Self {
            year: first.year(),
            month: first.month(),
        })
    }
}

/// Renders as the full month name and year, e.g. `March 2024`.
impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(first) => write!(f, "{}", first.format("%B %Y")),
            None => write!(f, "{:04}-{:02}", self.year, self.month),
        }
    }
}

/// The two columns a search may be run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchField {
    Date,
    Category,
}

impl FromStr for SearchField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "category" => Ok(Self::Category),
            _ => Err(Error::InvalidSearchField(s.to_owned())),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Date => "date",
            Self::Category => "category",
        })
    }
}

/// Everything that can go wrong while talking to the store. The validation
/// variants are all recoverable by asking the user again; `EmptyStore` is
/// informational. `Io` and `Csv` are real filesystem faults.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDateFormat(String),
    #[error("Invalid amount '{0}', expected a numeric value")]
    InvalidAmountFormat(String),
    #[error("Amount must be a positive number (got {0})")]
    NonPositiveAmount(String),
    #[error("Amount '{0}' is outside the supported range")]
    AmountOutOfRange(String),
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonthFormat(String),
    #[error("Invalid search field '{0}', expected 'date' or 'category'")]
    InvalidSearchField(String),
    #[error("No expenses recorded yet")]
    EmptyStore,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
