use crate::{
    compute::MonthlyTotal,
    data::{Error, Record, SearchField, YearMonth},
    read::{read_records, RecordList, RecordUser, Search},
    write::{record_line, resolve_amount, resolve_date, write_header},
};
use chrono::NaiveDate;
use std::{
    fs::{self, File, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// The backing table. Holds nothing but its location: every operation opens the
/// file, reads or appends, and closes it again before returning.
#[derive(Debug, Clone)]
pub(crate) struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the table with its header if it is missing. An existing file is
    /// left alone, whatever its content. Returns whether the file was created.
    pub fn ensure_exists(&self) -> Result<bool, Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        write_header(file)?;
        info!(path = %self.path.display(), "created store");
        Ok(true)
    }

    /// Validates raw user input and appends the resulting record. A blank date
    /// means `today`. Nothing is written unless every field is valid.
    pub fn add_record(
        &self,
        today: NaiveDate,
        date: &str,
        amount: &str,
        category: &str,
    ) -> Result<Record, Error> {
        let record = Record {
            date: resolve_date(date, today)?,
            amount: resolve_amount(amount)?,
            category: category.to_owned(),
        };
        self.append(&record)?;
        Ok(record)
    }

    /// Appends a validated record as exactly one line.
    fn append(&self, record: &Record) -> Result<(), Error> {
        self.ensure_exists()?;
        let line = record_line(record)?;
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(&line)?;
        info!(date = %record.date, amount = %record.amount, "appended record");
        Ok(())
    }

    /// Every record in file order.
    pub fn list_all(&self) -> Result<Vec<Record>, Error> {
        let mut list = RecordList::default();
        match self.scan(&mut list)? {
            Some(rows) if rows > 0 => Ok(list.records),
            _ => Err(Error::EmptyStore),
        }
    }

    /// Records whose `field` matches `term`, in file order. An empty vector
    /// means the table has data but nothing matched.
    pub fn search(&self, field: SearchField, term: &str) -> Result<Vec<Record>, Error> {
        let mut search = Search::new(field, term);
        match self.scan(&mut search)? {
            Some(rows) if rows > 0 => Ok(search.matches),
            _ => Err(Error::EmptyStore),
        }
    }

    /// Sum of the amounts recorded in `month`. Only a missing table, or a
    /// file without even a header, is an error; a table without matching rows
    /// totals zero.
    pub fn monthly_total(&self, month: YearMonth) -> Result<MonthlyTotal, Error> {
        let mut total = MonthlyTotal::new(month);
        match self.scan(&mut total)? {
            Some(_) => {
                debug!(month = %total.month, matched = total.count, "computed monthly total");
                Ok(total)
            }
            None => Err(Error::EmptyStore),
        }
    }

    /// `None` when the file does not exist or is empty, otherwise the number of
    /// data rows.
    fn scan<U: RecordUser>(&self, user: &mut U) -> Result<Option<usize>, Error> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        if file.metadata()?.len() == 0 {
            debug!(path = %self.path.display(), "store has no header");
            return Ok(None);
        }
        read_records(file, user).map(Some)
    }
}
