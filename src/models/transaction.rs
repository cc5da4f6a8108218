use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use super::RowKey;

/// Day zero of the spreadsheet serial date encoding.
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Whole days between the serial epoch and `date`.
pub fn to_serial(date: NaiveDate) -> i64 {
    (date - serial_epoch()).num_days()
}

pub fn from_serial(serial: i64) -> Option<NaiveDate> {
    serial_epoch().checked_add_signed(Duration::try_days(serial)?)
}

/// Canonical transaction produced by the parser and consumed by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub merchant: String,
    /// User annotation slot in the ledger. Always empty on import.
    pub note: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    /// Category to store with the row on append, if already known.
    pub category: Option<String>,
}

impl Transaction {
    pub fn new(merchant: String, date: NaiveDate, amount: Decimal) -> Self {
        Self {
            merchant,
            note: String::new(),
            date,
            amount,
            category: None,
        }
    }

    /// The cells this transaction occupies once written, in the store's encoding.
    pub fn row_key(&self) -> RowKey {
        RowKey {
            merchant: self.merchant.clone(),
            note: self.note.clone(),
            date_serial: to_serial(self.date),
            amount: self.amount,
        }
    }
}
