use regex::Regex;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::{Column, LedgerRow, RowRange};

/// Running-balance formulas for an appended range: each row adds its amount
/// to the balance of the row above.
pub(crate) fn balance_formulas(range: RowRange) -> Vec<String> {
    let (bal, amt) = (Column::Balance.letter(), Column::Amount.letter());
    range
        .rows()
        .map(|i| format!("={bal}{}+{amt}{i}", i - 1))
        .collect()
}

/// Evaluate `=E{a}+D{b}` balance formulas over rows read in store order.
/// References outside `rows` count as zero; anything else evaluates to `None`.
pub(crate) fn evaluate_balances(rows: &[LedgerRow]) -> Vec<Option<Decimal>> {
    let Ok(re) = Regex::new(r"^=E(\d+)\+D(\d+)$") else {
        return vec![None; rows.len()];
    };
    let amounts: HashMap<u32, Decimal> = rows.iter().map(|r| (r.row, r.amount)).collect();
    let mut balances: HashMap<u32, Decimal> = HashMap::new();

    rows.iter()
        .map(|r| {
            let caps = re.captures(r.balance.trim())?;
            let prev: u32 = caps[1].parse().ok()?;
            let amt_row: u32 = caps[2].parse().ok()?;
            let value = balances.get(&prev).copied().unwrap_or_default()
                + amounts.get(&amt_row).copied().unwrap_or_default();
            balances.insert(r.row, value);
            Some(value)
        })
        .collect()
}
