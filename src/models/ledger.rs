use rust_decimal::Decimal;

/// One of the two independent transaction logs. Chosen by source format,
/// never by amount sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerSection {
    Debit,
    Credit,
}

impl LedgerSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "Debit",
            Self::Credit => "Credit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            _ => None,
        }
    }

    /// Processing order for a run.
    pub fn all() -> &'static [LedgerSection] {
        &[Self::Debit, Self::Credit]
    }
}

impl std::fmt::Display for LedgerSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ledger columns, laid out A..F.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Merchant,
    Note,
    Date,
    Amount,
    Balance,
    Category,
}

impl Column {
    pub fn all() -> &'static [Column] {
        &[
            Self::Merchant,
            Self::Note,
            Self::Date,
            Self::Amount,
            Self::Balance,
            Self::Category,
        ]
    }

    pub fn letter(&self) -> char {
        match self {
            Self::Merchant => 'A',
            Self::Note => 'B',
            Self::Date => 'C',
            Self::Amount => 'D',
            Self::Balance => 'E',
            Self::Category => 'F',
        }
    }
}

/// Inclusive range of absolute row numbers. Row 1 is the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: u32,
    pub end: u32,
}

impl RowRange {
    pub const FIRST_DATA_ROW: u32 = 2;

    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rows(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    pub fn contains(&self, row: u32) -> bool {
        row >= self.start && row <= self.end
    }

    /// The last `n` rows ending at `end`, clamped to the first data row.
    pub fn tail(end: u32, n: u32) -> Self {
        let start = end
            .saturating_sub(n.saturating_sub(1))
            .max(Self::FIRST_DATA_ROW);
        Self { start, end }
    }

    /// A1-style label such as `Debit!A12:F14`.
    pub fn a1(&self, section: LedgerSection) -> String {
        let columns = Column::all();
        let first = columns.first().map_or('A', Column::letter);
        let last = columns.last().map_or('F', Column::letter);
        format!("{}!{first}{}:{last}{}", section, self.start, self.end)
    }
}

impl std::fmt::Display for RowRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rows {}-{}", self.start, self.end)
    }
}

/// Stored cell values compared during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowKey {
    pub merchant: String,
    pub note: String,
    pub date_serial: i64,
    pub amount: Decimal,
}

/// A row as read back from the store: serial dates, formula text for balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub row: u32,
    pub merchant: String,
    pub note: String,
    pub date_serial: i64,
    pub amount: Decimal,
    pub balance: String,
    pub category: String,
}

impl LedgerRow {
    pub fn key(&self) -> RowKey {
        RowKey {
            merchant: self.merchant.clone(),
            note: self.note.clone(),
            date_serial: self.date_serial,
            amount: self.amount,
        }
    }

    pub fn has_category(&self) -> bool {
        !self.category.trim().is_empty()
    }
}
