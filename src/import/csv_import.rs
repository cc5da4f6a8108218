use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use super::detect::{col_index, detect_source_kind, normalize_headers, AmountColumns, SourceKind};
use crate::error::ImportError;
use crate::models::{LedgerSection, Transaction};

const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%m/%d/%y", "%m-%d-%Y"];

/// Header row plus data rows of one CSV file, as strings.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl RawTable {
    pub(crate) fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// Transactions from one file, tagged with the ledger section they belong to.
#[derive(Debug, Clone)]
pub(crate) struct ParsedBatch {
    pub(crate) source: SourceKind,
    pub(crate) section: LedgerSection,
    pub(crate) transactions: Vec<Transaction>,
}

pub(crate) struct CsvImporter;

impl CsvImporter {
    pub(crate) fn load(path: &Path) -> Result<RawTable, ImportError> {
        let load_err = |source| ImportError::Load {
            file: path.to_path_buf(),
            source,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_path(path)
            .map_err(load_err)?;

        let headers = rdr
            .headers()
            .map_err(load_err)?
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(load_err)?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(RawTable::new(headers, rows))
    }

    /// Load and parse one file. `Ok(None)` when the file is not a recognized export.
    pub(crate) fn parse_file(path: &Path) -> Result<Option<ParsedBatch>, ImportError> {
        let table = Self::load(path)?;
        Self::parse(path, &table)
    }

    pub(crate) fn parse(file: &Path, table: &RawTable) -> Result<Option<ParsedBatch>, ImportError> {
        let Some(source) = detect_source_kind(&table.headers) else {
            warn!(file = %file.display(), "unrecognized column signature, skipping");
            return Ok(None);
        };
        debug!(file = %file.display(), %source, "detected format");

        let columns = Columns::resolve(file, source, &table.headers)?;

        let mut rows: &[Vec<String>] = &table.rows;
        let mut first_row = 1;
        if source.has_pending_head() {
            while let Some(row) = rows.first() {
                if !is_pending(&cell(row, columns.description)) {
                    break;
                }
                rows = &rows[1..];
                first_row += 1;
            }
            if first_row > 1 {
                debug!(file = %file.display(), dropped = first_row - 1, "dropped pending rows");
            }
        }

        let mut transactions = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let row_no = first_row + i;
            if row.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            let date_str = cell(row, columns.date);

            let date = parse_date(&date_str).ok_or_else(|| ImportError::MalformedDate {
                file: file.to_path_buf(),
                row: row_no,
                value: date_str.clone(),
            })?;

            let raw_amount = columns.amount_cell(row);
            let amount = parse_amount(&raw_amount).ok_or_else(|| ImportError::MalformedAmount {
                file: file.to_path_buf(),
                row: row_no,
                value: raw_amount.clone(),
            })?;

            transactions.push(Transaction::new(cell(row, columns.description), date, amount));
        }

        if source.lists_newest_first() {
            transactions.reverse();
            transactions.sort_by_key(|t| t.date);
        }

        Ok(Some(ParsedBatch {
            source,
            section: source.section(),
            transactions,
        }))
    }
}

/// Resolved column indices for one table.
struct Columns {
    description: usize,
    date: usize,
    amount: usize,
    fallback_amount: Option<usize>,
}

impl Columns {
    fn resolve(file: &Path, source: SourceKind, headers: &[String]) -> Result<Self, ImportError> {
        let h = normalize_headers(headers);
        let layout = source.layout();
        let find = |name: &'static str| {
            col_index(&h, name).ok_or_else(|| ImportError::MissingColumn {
                file: PathBuf::from(file),
                column: name,
            })
        };

        let (amount, fallback_amount) = match layout.amount {
            AmountColumns::Single(name) => (find(name)?, None),
            AmountColumns::DebitOrCredit { debit, credit } => (find(debit)?, Some(find(credit)?)),
        };

        Ok(Self {
            description: find(layout.description)?,
            date: find(layout.date)?,
            amount,
            fallback_amount,
        })
    }

    fn amount_cell(&self, row: &[String]) -> String {
        let primary = cell(row, self.amount);
        match self.fallback_amount {
            Some(col) if primary.is_empty() => cell(row, col),
            _ => primary,
        }
    }
}

fn cell(row: &[String], col: usize) -> String {
    row.get(col).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Pending rows carry a capitalized `Pending` marker in the description.
fn is_pending(description: &str) -> bool {
    description.contains("Pending")
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        // "%Y" happily reads "24" as year 24; let "%y" handle two-digit years.
        .find(|d| d.year() >= 1900)
}

/// Parse a bank amount. A leading `(` marks a negative; `$`, `,` and whitespace are ignored.
pub(crate) fn parse_amount(s: &str) -> Option<Decimal> {
    let trimmed = s.trim().trim_matches('"').trim();
    let negative_parens = trimmed.starts_with('(');
    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '(' | ')') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negative_parens { -value } else { value })
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
