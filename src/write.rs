use crate::data::{Error, Record, DATE_FORMAT, HEADER};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Writes the header line of a fresh table.
pub(crate) fn write_header<W: std::io::Write>(writer: W) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    wtr.flush()?;
    Ok(())
}

/// Serializes one record as a single CSV line. The caller appends the returned
/// bytes in one write, so a failure never leaves half a line behind.
pub(crate) fn record_line(record: &Record) -> Result<Vec<u8>, Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.serialize(record)?;
    wtr.into_inner().map_err(|e| Error::Io(e.into_error()))
}

/// An empty input means `today`; anything else must be exactly `YYYY-MM-DD`.
pub(crate) fn resolve_date(input: &str, today: NaiveDate) -> Result<NaiveDate, Error> {
    if input.is_empty() {
        return Ok(today);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| Error::InvalidDateFormat(input.to_owned()))
}

/// Parses a strictly positive amount. Plain decimals keep their scale;
/// scientific notation (`1e3`) is accepted as well. Numbers `Decimal` cannot
/// hold are told apart from text that is not a number at all.
pub(crate) fn resolve_amount(input: &str) -> Result<Decimal, Error> {
    let trimmed = input.trim();
    let amount = match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        Ok(amount) => amount,
        Err(_) => {
            return Err(match trimmed.parse::<f64>() {
                Ok(value) if value.is_finite() && value <= 0.0 => {
                    Error::NonPositiveAmount(input.to_owned())
                }
                Ok(value) if value.is_finite() => Error::AmountOutOfRange(input.to_owned()),
                _ => Error::InvalidAmountFormat(input.to_owned()),
            })
        }
    };
    if amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount(input.to_owned()));
    }
    Ok(amount)
}
