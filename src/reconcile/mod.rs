use tracing::debug;

use crate::models::{LedgerRow, RowKey, Transaction};

/// The suffix of `incoming` that is not yet recorded in the ledger tail.
///
/// Tail matching, not a diff: if the newest incoming transaction is already
/// in the tail the whole batch is considered recorded; otherwise leading
/// transactions are dropped while they appear in the tail, and everything
/// from the first unseen transaction on is returned. Rows missing from the
/// middle of the tail are not detected.
pub(crate) fn reconcile(incoming: Vec<Transaction>, tail: &[LedgerRow]) -> Vec<Transaction> {
    if incoming.is_empty() || tail.is_empty() {
        return incoming;
    }

    let recorded: Vec<RowKey> = tail.iter().map(LedgerRow::key).collect();
    let is_recorded = |txn: &Transaction| recorded.contains(&txn.row_key());

    if incoming.last().is_some_and(is_recorded) {
        debug!(batch = incoming.len(), "newest transaction already recorded");
        return Vec::new();
    }

    let already = incoming.iter().take_while(|t| is_recorded(*t)).count();
    debug!(batch = incoming.len(), already, "trimmed recorded prefix");
    incoming.into_iter().skip(already).collect()
}
