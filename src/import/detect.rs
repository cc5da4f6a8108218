use crate::models::LedgerSection;

/// Where the amount of a row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AmountColumns {
    Single(&'static str),
    /// Debit cell, or the credit cell when the debit cell is blank.
    DebitOrCredit {
        debit: &'static str,
        credit: &'static str,
    },
}

/// Column names used to read one source kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnLayout {
    pub(crate) description: &'static str,
    pub(crate) date: &'static str,
    pub(crate) amount: AmountColumns,
}

/// The export formats recognized by column signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceKind {
    /// Credit-union checking export with a "Check Number" column.
    /// Pending rows are listed first.
    CheckingExport,
    /// Card statement with a "Member Name" column, newest row first.
    CardStatement,
    /// Bank checking export keyed by "Posting Date".
    PostingExport,
}

impl SourceKind {
    /// Detection order.
    pub(crate) fn all() -> &'static [SourceKind] {
        &[Self::CheckingExport, Self::CardStatement, Self::PostingExport]
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::CheckingExport => "Checking export (check number)",
            Self::CardStatement => "Card statement (member name)",
            Self::PostingExport => "Checking export (posting date)",
        }
    }

    /// Lowercased header whose presence identifies this kind.
    pub(crate) fn signature(&self) -> &'static str {
        match self {
            Self::CheckingExport => "check number",
            Self::CardStatement => "member name",
            Self::PostingExport => "posting date",
        }
    }

    pub(crate) fn section(&self) -> LedgerSection {
        match self {
            Self::CheckingExport | Self::PostingExport => LedgerSection::Debit,
            Self::CardStatement => LedgerSection::Credit,
        }
    }

    pub(crate) fn layout(&self) -> ColumnLayout {
        match self {
            Self::CheckingExport => ColumnLayout {
                description: "description",
                date: "date",
                amount: AmountColumns::Single("amount"),
            },
            Self::CardStatement => ColumnLayout {
                description: "description",
                date: "date",
                amount: AmountColumns::DebitOrCredit {
                    debit: "debit",
                    credit: "credit",
                },
            },
            Self::PostingExport => ColumnLayout {
                description: "description",
                date: "posting date",
                amount: AmountColumns::Single("amount"),
            },
        }
    }

    /// Leading pending rows are dropped; they come back settled in a later export.
    pub(crate) fn has_pending_head(&self) -> bool {
        matches!(self, Self::CheckingExport)
    }

    pub(crate) fn lists_newest_first(&self) -> bool {
        matches!(self, Self::CardStatement)
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identify the export format from its header row. `None` means the file is
/// not a recognized bank export.
pub(crate) fn detect_source_kind(headers: &[String]) -> Option<SourceKind> {
    let h = normalize_headers(headers);
    SourceKind::all()
        .iter()
        .copied()
        .find(|kind| h.iter().any(|name| name == kind.signature()))
}

pub(crate) fn normalize_headers(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|s| s.trim().trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect()
}

pub(crate) fn col_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

#[cfg(test)]
#[path = "detect_tests.rs"]
mod tests;
