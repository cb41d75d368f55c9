use crate::data::{Error, Record, SearchField, HEADER};
use tracing::{debug, warn};

/// Trait for doing something with a `Record` read from the store. Every read
/// path (listing, searching, totalling) is one of these plugged into
/// `read_records`, so they all share the same malformed-row policy.
pub(crate) trait RecordUser {
    fn use_record(&mut self, record: Record);
}

/// Scans a CSV table, header first, feeding each well-formed row to `user` in
/// file order. Rows with the wrong field count, an unparsable date or amount,
/// or invalid UTF-8 are skipped with a warning rather than aborting the scan.
///
/// Returns the number of data rows seen, malformed ones included, so that
/// callers can tell an empty table from one where nothing matched.
pub(crate) fn read_records<R: std::io::Read, U: RecordUser>(
    reader: R,
    user: &mut U,
) -> Result<usize, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let mut rows = 0;
    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                rows += 1;
                warn!("skipping unreadable row: {e}");
                continue;
            }
        };
        rows += 1;
        let line = row.position().map_or(0, |p| p.line());
        if row.len() != HEADER.len() {
            warn!(line, fields = row.len(), "skipping row with wrong field count");
            continue;
        }
        match row.deserialize::<Record>(None) {
            Ok(record) => user.use_record(record),
            Err(e) => warn!(line, "skipping malformed row: {e}"),
        }
    }
    debug!(rows, "scanned store");
    Ok(rows)
}

/// Collects every record, in file order.
#[derive(Debug, Default)]
pub(crate) struct RecordList {
    pub records: Vec<Record>,
}

impl RecordUser for RecordList {
    fn use_record(&mut self, record: Record) {
        self.records.push(record);
    }
}

/// Collects the records whose `field` equals `term`, ignoring case and
/// surrounding whitespace on both sides.
#[derive(Debug)]
pub(crate) struct Search {
    field: SearchField,
    term: String,
    pub matches: Vec<Record>,
}

impl Search {
    pub fn new(field: SearchField, term: &str) -> Self {
        Self {
            field,
            term: normalize(term),
            matches: Vec::new(),
        }
    }
}

impl RecordUser for Search {
    fn use_record(&mut self, record: Record) {
        let value = match self.field {
            SearchField::Date => normalize(&record.date.to_string()),
            SearchField::Category => normalize(&record.category),
        };
        if value == self.term {
            self.matches.push(record);
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
