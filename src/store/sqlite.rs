use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use super::{schema, LedgerStore};
use crate::error::StoreError;
use crate::models::{to_serial, Column, LedgerRow, LedgerSection, RowRange, Transaction};

/// Ledger sections kept as row-numbered tables in one SQLite file.
pub(crate) struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open ledger: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut ledger = Self { conn };
        ledger.migrate().context("Ledger migration failed")?;
        Ok(ledger)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut ledger = Self { conn };
        ledger.migrate()?;
        Ok(ledger)
    }

    /// Create the schema on first open; refuse files written by another schema version.
    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            return Ok(());
        }

        let version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .context("Ledger has no schema version")?;
        if version != schema::CURRENT_VERSION {
            anyhow::bail!(
                "Unsupported ledger schema version {version} (expected {})",
                schema::CURRENT_VERSION
            );
        }
        Ok(())
    }

    fn column_name(column: Column) -> Result<&'static str, StoreError> {
        match column {
            Column::Balance => Ok("balance"),
            Column::Category => Ok("category"),
            other => Err(StoreError::ReadOnlyColumn(other.letter())),
        }
    }
}

impl LedgerStore for SqliteLedger {
    fn data_end(&self, section: LedgerSection) -> Result<Option<u32>, StoreError> {
        let end: Option<u32> = self.conn.query_row(
            "SELECT MAX(row_num) FROM ledger_rows WHERE section = ?1",
            params![section.as_str()],
            |row| row.get(0),
        )?;
        Ok(end)
    }

    fn read_range(&self, section: LedgerSection, range: RowRange) -> Result<Vec<LedgerRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT row_num, merchant, note, date_serial, amount, balance, category
             FROM ledger_rows
             WHERE section = ?1 AND row_num BETWEEN ?2 AND ?3
             ORDER BY row_num",
        )?;
        let raw = stmt.query_map(params![section.as_str(), range.start, range.end], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut rows = Vec::new();
        for r in raw {
            let (row, merchant, note, date_serial, amount_str, balance, category) = r?;
            let amount = Decimal::from_str(&amount_str).map_err(|_| StoreError::CorruptRow {
                section,
                row,
                value: amount_str.clone(),
            })?;
            rows.push(LedgerRow {
                row,
                merchant,
                note,
                date_serial,
                amount,
                balance,
                category,
            });
        }
        Ok(rows)
    }

    fn append_rows(&mut self, section: LedgerSection, rows: &[Transaction]) -> Result<RowRange, StoreError> {
        let start = self
            .data_end(section)?
            .map_or(RowRange::FIRST_DATA_ROW, |end| end + 1);
        let range = RowRange::new(start, start + rows.len() as u32 - 1);
        if range.is_empty() {
            return Ok(range);
        }
        let now = chrono::Utc::now().to_rfc3339();

        let tx = self.conn.transaction()?;
        for (offset, txn) in rows.iter().enumerate() {
            tx.execute(
                "INSERT INTO ledger_rows (section, row_num, merchant, note, date_serial, amount, balance, category, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, '', ?7, ?8)",
                params![
                    section.as_str(),
                    start + offset as u32,
                    txn.merchant,
                    txn.note,
                    to_serial(txn.date),
                    txn.amount.to_string(),
                    txn.category.as_deref().unwrap_or(""),
                    now,
                ],
            )?;
        }
        tx.commit()?;

        debug!(%section, %range, "appended rows");
        Ok(range)
    }

    fn patch_column(
        &mut self,
        section: LedgerSection,
        range: RowRange,
        column: Column,
        values: &[String],
    ) -> Result<(), StoreError> {
        if values.len() != range.len() {
            return Err(StoreError::RangeMismatch {
                section,
                range,
                expected: range.len(),
                actual: values.len(),
            });
        }
        let name = Self::column_name(column)?;
        let sql = format!("UPDATE ledger_rows SET {name} = ?1 WHERE section = ?2 AND row_num = ?3");

        let tx = self.conn.transaction()?;
        let mut found = 0;
        for (row, value) in range.rows().zip(values) {
            found += tx.execute(&sql, params![value, section.as_str(), row])?;
        }
        if found != range.len() {
            // Dropping the transaction rolls back the partial patch.
            return Err(StoreError::MissingRows {
                section,
                range,
                found,
            });
        }
        tx.commit()?;

        debug!(%section, %range, column = %column.letter(), "patched column");
        Ok(())
    }
}
