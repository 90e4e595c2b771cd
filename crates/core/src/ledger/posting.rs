//! Pure validation logic for the posting engine.
//!
//! This module only validates; it has no knowledge of storage. The
//! database-backed `create_transaction` in `ledgerkeep-db` calls
//! [`validate_posting`] before acquiring any locks or writing any rows, so
//! a rejected transaction never touches the database.

use rust_decimal::Decimal;

use super::amount::round_amount;
use super::error::LedgerError;
use super::types::{CreateTransactionInput, NewLedgerEntry};

/// Validates a prospective transaction against the three posting
/// invariants: non-empty, not already persisted, and balanced.
///
/// Rounds every entry's amount to [`super::amount::AMOUNT_SCALE`] fractional
/// digits in place before checking balance, so ingestion rounding (§4.2,
/// §8) is enforced for every entry regardless of whether it was built via
/// [`super::amount::SignConvention`]'s `credit`/`debit` or constructed
/// directly.
///
/// # Errors
/// Returns [`LedgerError::NoLedgerEntries`], [`LedgerError::ExistingLedgerEntries`],
/// or [`LedgerError::TransactionBalance`] as appropriate.
pub fn validate_posting(input: &mut CreateTransactionInput) -> Result<(), LedgerError> {
    if input.entries.is_empty() {
        return Err(LedgerError::NoLedgerEntries);
    }

    if let Some(existing) = input.entries.iter().find_map(|e| e.existing_entry_id) {
        return Err(LedgerError::ExistingLedgerEntries { entry_id: existing });
    }

    for entry in &mut input.entries {
        entry.amount = round_amount(entry.amount);
    }

    let sum = sum_amounts(&input.entries);
    if sum != Decimal::ZERO {
        return Err(LedgerError::TransactionBalance { sum });
    }

    Ok(())
}

/// Sums the signed amounts of a set of entries.
#[must_use]
pub fn sum_amounts(entries: &[NewLedgerEntry]) -> Decimal {
    entries.iter().fold(Decimal::ZERO, |acc, e| acc + e.amount)
}

/// Returns the distinct ledger ids referenced by `entries`, sorted
/// ascending.
///
/// The posting engine must lock ledgers in this exact order (§4.2) to
/// avoid deadlocking against a concurrent posting touching an overlapping
/// set of ledgers in a different order.
#[must_use]
pub fn distinct_ledger_ids_ascending(entries: &[NewLedgerEntry]) -> Vec<i64> {
    let mut ids: Vec<i64> = entries.iter().map(|e| e.ledger_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
