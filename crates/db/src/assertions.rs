//! Equality assertion helper used by tests (§2's Query surface component).
//!
//! Grounded in capone's `assert_transaction_in_ledgers_for_amounts_with_evidence`
//! (`original_source/ledger/api/queries.py`): given the expected `(ledger,
//! amount)` pairs and evidence for a transaction, narrows to the unique
//! matching transaction (by `MatchType::Exact` evidence, then by ledger
//! membership) and asserts its entries and evidence equal what was
//! expected. Panics exactly where the original raised `DoesNotExist`,
//! `MultipleObjectsReturned`, or `AssertionError`.

use std::collections::HashSet;

use rust_decimal::Decimal;

use ledgerkeep_core::ledger::{EvidenceRef, MatchType};

use crate::repositories::error::RepoError;
use crate::repositories::transaction::TransactionRepository;

/// Asserts that exactly one transaction has entries matching
/// `ledger_amount_pairs` (as `(ledger_id, amount)` pairs) and evidence
/// exactly equal to `evidence`.
///
/// # Errors
/// Returns a wrapped storage fault if a query fails.
///
/// # Panics
/// Panics if no transaction matches, if more than one transaction matches,
/// or if the unique match's entries or evidence differ from what was given.
pub async fn assert_transaction_in_ledgers_for_amounts_with_evidence(
    transactions: &TransactionRepository,
    ledger_amount_pairs: &[(i64, Decimal)],
    evidence: &[EvidenceRef],
) -> Result<(), RepoError> {
    let evidence_set: HashSet<EvidenceRef> = evidence.iter().cloned().collect();
    let required_ledgers: HashSet<i64> = ledger_amount_pairs.iter().map(|(id, _)| *id).collect();

    let candidates = transactions.filter_by_related_objects(evidence, MatchType::Exact).await?;

    let mut matches = Vec::new();
    for candidate in candidates {
        let entries = transactions.entries_for(candidate.id).await?;
        let ledgers_in_txn: HashSet<i64> = entries.iter().map(|e| e.ledger_id).collect();
        if required_ledgers.is_subset(&ledgers_in_txn) {
            matches.push((candidate, entries));
        }
    }

    assert!(
        !matches.is_empty(),
        "no transaction matches ledgers {required_ledgers:?} and evidence {evidence_set:?}"
    );
    assert!(
        matches.len() == 1,
        "{} transactions match ledgers {required_ledgers:?} and evidence {evidence_set:?}, expected exactly one",
        matches.len()
    );

    let (transaction, entries) = &matches[0];

    let mut actual: Vec<(i64, Decimal)> = entries.iter().map(|e| (e.ledger_id, e.amount)).collect();
    actual.sort_unstable();
    let mut expected: Vec<(i64, Decimal)> = ledger_amount_pairs.to_vec();
    expected.sort_unstable();
    assert_eq!(actual, expected, "transaction {} entries do not match", transaction.id);

    let actual_evidence = transactions.evidence_for(transaction.id).await?;
    assert_eq!(actual_evidence, evidence_set, "transaction {} evidence does not match", transaction.id);

    Ok(())
}
