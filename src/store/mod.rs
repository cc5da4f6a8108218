mod schema;
mod sqlite;

pub(crate) use sqlite::SqliteLedger;

use crate::error::StoreError;
use crate::models::{Column, LedgerRow, LedgerSection, RowRange, Transaction};

/// Append-oriented tabular store holding the two ledger sections.
///
/// Rows are addressed by absolute row number; row 1 is the header row.
/// Reads return raw cell values: dates as serial day counts and the balance
/// column as formula text.
pub(crate) trait LedgerStore {
    /// Last occupied data row of `section`, or `None` when it has no data.
    fn data_end(&self, section: LedgerSection) -> Result<Option<u32>, StoreError>;

    fn read_range(&self, section: LedgerSection, range: RowRange) -> Result<Vec<LedgerRow>, StoreError>;

    /// Append after the last data row and report the rows written.
    fn append_rows(&mut self, section: LedgerSection, rows: &[Transaction]) -> Result<RowRange, StoreError>;

    /// Overwrite one column for `range`, leaving the other columns untouched.
    fn patch_column(
        &mut self,
        section: LedgerSection,
        range: RowRange,
        column: Column,
        values: &[String],
    ) -> Result<(), StoreError>;

    /// The last `n` data rows of `section`.
    fn read_tail(&self, section: LedgerSection, n: u32) -> Result<Vec<LedgerRow>, StoreError> {
        match self.data_end(section)? {
            Some(end) if n > 0 => self.read_range(section, RowRange::tail(end, n)),
            _ => Ok(Vec::new()),
        }
    }

    /// Every data row from the first through `end`.
    fn read_history(&self, section: LedgerSection, end: u32) -> Result<Vec<LedgerRow>, StoreError> {
        self.read_range(section, RowRange::new(RowRange::FIRST_DATA_ROW, end))
    }
}
