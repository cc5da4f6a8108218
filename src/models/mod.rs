mod ledger;
mod transaction;

pub use ledger::{Column, LedgerRow, LedgerSection, RowKey, RowRange};
pub use transaction::{from_serial, to_serial, Transaction};
