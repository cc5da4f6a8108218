use std::collections::HashMap;
use tracing::debug;

use crate::models::LedgerRow;
use crate::normalize::MerchantNormalizer;

/// Normalized merchant to the category it was last filed under.
pub(crate) struct CategoryIndex {
    categories: HashMap<String, String>,
}

/// Category chosen for one appended row. Empty means unclassified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryAssignment {
    pub(crate) row: u32,
    pub(crate) category: String,
}

impl CategoryIndex {
    /// Scan `history` in store order; later rows override earlier ones.
    /// Rows without a category do not erase an earlier assignment.
    pub(crate) fn build(history: &[LedgerRow], normalizer: &MerchantNormalizer) -> Self {
        let mut categories = HashMap::new();
        for row in history.iter().filter(|r| r.has_category()) {
            categories.insert(
                normalizer.normalize(&row.merchant),
                row.category.trim().to_string(),
            );
        }
        Self { categories }
    }

    pub(crate) fn lookup(&self, merchant: &str, normalizer: &MerchantNormalizer) -> Option<&str> {
        self.categories
            .get(&normalizer.normalize(merchant))
            .map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.categories.len()
    }
}

/// Give every appended row the category its merchant last had in `history`.
pub(crate) fn assign_categories(
    appended: &[LedgerRow],
    history: &[LedgerRow],
    normalizer: &MerchantNormalizer,
) -> Vec<CategoryAssignment> {
    let index = CategoryIndex::build(history, normalizer);
    debug!(merchants = index.len(), rows = appended.len(), "assigning categories");
    appended
        .iter()
        .map(|row| CategoryAssignment {
            row: row.row,
            category: index
                .lookup(&row.merchant, normalizer)
                .unwrap_or_default()
                .to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests;
