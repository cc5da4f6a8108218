use std::path::PathBuf;

use thiserror::Error;

use crate::models::{LedgerSection, RowRange};

/// Failures while turning one input file into transactions.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to load {}: {source}", file.display())]
    Load {
        file: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{}: row {row}: malformed amount '{value}'", file.display())]
    MalformedAmount {
        file: PathBuf,
        row: usize,
        value: String,
    },
    #[error("{}: row {row}: malformed date '{value}'", file.display())]
    MalformedDate {
        file: PathBuf,
        row: usize,
        value: String,
    },
    #[error("{}: missing column '{column}'", file.display())]
    MissingColumn { file: PathBuf, column: &'static str },
}

impl ImportError {
    pub fn file(&self) -> &std::path::Path {
        match self {
            Self::Load { file, .. }
            | Self::MalformedAmount { file, .. }
            | Self::MalformedDate { file, .. }
            | Self::MissingColumn { file, .. } => file,
        }
    }
}

/// Ledger store failures. Always fatal for the run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("{section}: {range} holds {expected} rows but {actual} values were given")]
    RangeMismatch {
        section: LedgerSection,
        range: RowRange,
        expected: usize,
        actual: usize,
    },
    #[error("{section}: row {row} has malformed stored value '{value}'")]
    CorruptRow {
        section: LedgerSection,
        row: u32,
        value: String,
    },
    #[error("{section}: {range} is not fully written ({found} rows present)")]
    MissingRows {
        section: LedgerSection,
        range: RowRange,
        found: usize,
    },
    #[error("column {0} cannot be patched")]
    ReadOnlyColumn(char),
}

/// A run-level failure, with the section it happened in when there is one.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("{section} section: {source}")]
    Store {
        section: LedgerSection,
        #[source]
        source: StoreError,
    },
}
