#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn row(n: u32, merchant: &str, category: &str) -> LedgerRow {
    LedgerRow {
        row: n,
        merchant: merchant.into(),
        note: String::new(),
        date_serial: 45300 + n as i64,
        amount: dec!(-10.00),
        balance: String::new(),
        category: category.into(),
    }
}

fn normalizer() -> MerchantNormalizer {
    MerchantNormalizer::default()
}

// ── CategoryIndex ─────────────────────────────────────────────

#[test]
fn test_index_most_recent_wins() {
    let history = vec![
        row(2, "STARBUCKS", "Coffee Shops"),
        row(3, "SHELL OIL", "Gas & Fuel"),
        row(4, "STARBUCKS", "Dining"),
    ];
    let n = normalizer();
    let index = CategoryIndex::build(&history, &n);
    assert_eq!(index.lookup("STARBUCKS", &n), Some("Dining"));
    assert_eq!(index.lookup("SHELL OIL", &n), Some("Gas & Fuel"));
    assert_eq!(index.len(), 2);
}

#[test]
fn test_index_blank_category_does_not_erase() {
    let history = vec![row(2, "STARBUCKS", "Dining"), row(3, "STARBUCKS", "  ")];
    let n = normalizer();
    let index = CategoryIndex::build(&history, &n);
    assert_eq!(index.lookup("STARBUCKS", &n), Some("Dining"));
}

#[test]
fn test_index_keys_are_normalized() {
    let history = vec![row(2, "WAL-MART #1234 SAN JOSE", "Groceries")];
    let n = normalizer();
    let index = CategoryIndex::build(&history, &n);
    assert_eq!(index.lookup("WAL-MART", &n), Some("Groceries"));
    assert_eq!(index.lookup("WAL-MART #9999", &n), Some("Groceries"));
}

#[test]
fn test_index_lookup_is_case_sensitive() {
    let history = vec![row(2, "STARBUCKS", "Dining")];
    let n = normalizer();
    let index = CategoryIndex::build(&history, &n);
    assert_eq!(index.lookup("Starbucks", &n), None);
}

#[test]
fn test_index_empty_history() {
    let index = CategoryIndex::build(&[], &normalizer());
    assert_eq!(index.len(), 0);
}

// ── assign_categories ─────────────────────────────────────────

#[test]
fn test_assign_known_merchant() {
    let mut history = vec![
        row(2, "STARBUCKS", "Coffee Shops"),
        row(3, "STARBUCKS", "Dining"),
    ];
    let appended = vec![row(4, "STARBUCKS", ""), row(5, "STARBUCKS", "")];
    history.extend(appended.clone());

    let result = assign_categories(&appended, &history, &normalizer());
    assert_eq!(
        result,
        vec![
            CategoryAssignment { row: 4, category: "Dining".into() },
            CategoryAssignment { row: 5, category: "Dining".into() },
        ]
    );
}

#[test]
fn test_assign_unknown_merchant_empty() {
    let history = vec![row(2, "STARBUCKS", "Dining")];
    let appended = vec![row(3, "NEW PLACE", "")];
    let result = assign_categories(&appended, &history, &normalizer());
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].row, 3);
    assert!(result[0].category.is_empty());
}

#[test]
fn test_assign_preserves_appended_order() {
    let history = vec![row(2, "A", "One"), row(3, "B", "Two")];
    let appended = vec![row(4, "B", ""), row(5, "C", ""), row(6, "A", "")];
    let cats: Vec<String> = assign_categories(&appended, &history, &normalizer())
        .into_iter()
        .map(|a| a.category)
        .collect();
    assert_eq!(cats, vec!["Two", "", "One"]);
}

#[test]
fn test_assign_nothing_appended() {
    let history = vec![row(2, "A", "One")];
    assert!(assign_categories(&[], &history, &normalizer()).is_empty());
}
