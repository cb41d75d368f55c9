use crate::{
    data::{Record, YearMonth},
    read::RecordUser,
};
use rust_decimal::Decimal;
use tracing::warn;

/// Running sum of the amounts recorded in one month. Rows that failed to parse
/// never reach here: `read_records` already dropped them. A row that would push
/// the sum past the `Decimal` range is skipped like any other bad row.
#[derive(Debug)]
pub(crate) struct MonthlyTotal {
    pub month: YearMonth,
    pub total: Decimal,
    pub count: usize,
}

impl MonthlyTotal {
    pub fn new(month: YearMonth) -> Self {
        Self {
            month,
            total: Decimal::ZERO,
            count: 0,
        }
    }
}

impl RecordUser for MonthlyTotal {
    fn use_record(&mut self, record: Record) {
        if !self.month.contains(record.date) {
            return;
        }
        match self.total.checked_add(record.amount) {
            Some(total) => {
                self.total = total;
                self.count += 1;
            }
            None => warn!(
                date = %record.date,
                amount = %record.amount,
                "skipping row that overflows the monthly total"
            ),
        }
    }
}
