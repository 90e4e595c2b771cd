//! Pure logic for the void engine.
//!
//! Voiding never deletes anything: it builds a brand-new, balanced
//! transaction whose entries are the pointwise negation of the voided
//! transaction's entries, carrying the same evidence, then links the two
//! via `voids`. The database-backed `void_transaction` in `ledgerkeep-db`
//! checks the one-to-one `voided_by` invariant, calls
//! [`build_void_input`], posts it through the ordinary posting engine, and
//! finally sets `voids`.

use chrono::{DateTime, Utc};

use super::types::{CreateTransactionInput, EvidenceRef, LedgerEntry, NewLedgerEntry, Transaction, VoidTransactionInput};

/// Negates every entry of a transaction, preserving the ledger each entry
/// targets.
#[must_use]
pub fn negate_entries(entries: &[LedgerEntry]) -> Vec<NewLedgerEntry> {
    entries
        .iter()
        .map(|e| NewLedgerEntry::new(e.ledger_id, -e.amount))
        .collect()
}

/// The default notes a void gets when the caller does not supply its own:
/// `"Voiding transaction <transaction_id>"`.
#[must_use]
pub fn default_void_notes(transaction: &Transaction) -> String {
    format!("Voiding transaction {}", transaction.transaction_id)
}

/// Builds the [`CreateTransactionInput`] for the voiding transaction, given
/// the transaction being voided, its entries, its evidence, and the void
/// call's own (possibly partial) input.
///
/// This does not check the one-to-one void invariant — the caller (the
/// database-backed void engine) must have already confirmed the voided
/// transaction has no `voided_by` back-reference before calling this.
#[must_use]
pub fn build_void_input(
    voided: &Transaction,
    voided_entries: &[LedgerEntry],
    voided_evidence: Vec<EvidenceRef>,
    void_input: &VoidTransactionInput,
) -> CreateTransactionInput {
    let notes = void_input
        .notes
        .clone()
        .unwrap_or_else(|| default_void_notes(voided));
    let transaction_type_id = void_input.transaction_type_id.or(Some(voided.transaction_type_id));
    let posted_at: Option<DateTime<Utc>> = void_input.posted_at.or(Some(voided.posted_at));

    CreateTransactionInput {
        user: void_input.user.clone(),
        evidence: voided_evidence,
        entries: negate_entries(voided_entries),
        notes,
        transaction_type_id,
        posted_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn entry(ledger_id: i64, amount: rust_decimal::Decimal) -> LedgerEntry {
        LedgerEntry {
            entry_id: Uuid::new_v4(),
            transaction_id: 1,
            ledger_id,
            amount,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        }
    }

    fn transaction() -> Transaction {
        Transaction {
            id: 1,
            transaction_id: Uuid::new_v4(),
            created_by: "user-1".into(),
            notes: "original".into(),
            posted_at: Utc::now(),
            transaction_type_id: 7,
            voids: None,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        }
    }

    #[test]
    fn negates_every_entry_preserving_ledger() {
        let entries = vec![entry(1, dec!(-100)), entry(2, dec!(100))];
        let negated = negate_entries(&entries);
        assert_eq!(negated[0].ledger_id, 1);
        assert_eq!(negated[0].amount, dec!(100));
        assert_eq!(negated[1].ledger_id, 2);
        assert_eq!(negated[1].amount, dec!(-100));
    }

    #[test]
    fn default_notes_reference_the_voided_transaction_id() {
        let t = transaction();
        assert_eq!(default_void_notes(&t), format!("Voiding transaction {}", t.transaction_id));
    }

    #[test]
    fn build_void_input_defaults_type_and_posted_at_from_voided() {
        let t = transaction();
        let entries = vec![entry(1, dec!(-100)), entry(2, dec!(100))];
        let evidence = vec![EvidenceRef::new("order", 1)];
        let void_input = VoidTransactionInput::new("user-2");

        let result = build_void_input(&t, &entries, evidence.clone(), &void_input);

        assert_eq!(result.transaction_type_id, Some(t.transaction_type_id));
        assert_eq!(result.posted_at, Some(t.posted_at));
        assert_eq!(result.notes, format!("Voiding transaction {}", t.transaction_id));
        assert_eq!(result.evidence, evidence);
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0].amount, dec!(100));
    }

    #[test]
    fn build_void_input_honors_explicit_overrides() {
        let t = transaction();
        let entries = vec![entry(1, dec!(-100)), entry(2, dec!(100))];
        let posted_at = Utc::now();
        let void_input = VoidTransactionInput {
            user: "user-2".into(),
            notes: Some("custom note".into()),
            transaction_type_id: Some(99),
            posted_at: Some(posted_at),
        };

        let result = build_void_input(&t, &entries, vec![], &void_input);

        assert_eq!(result.notes, "custom note");
        assert_eq!(result.transaction_type_id, Some(99));
        assert_eq!(result.posted_at, Some(posted_at));
    }

    #[test]
    fn voiding_a_void_reinstates_the_original_effect() {
        let original_entries = vec![entry(1, dec!(-100)), entry(2, dec!(100))];
        let voided_once = negate_entries(&original_entries);
        let as_persisted: Vec<LedgerEntry> = voided_once
            .iter()
            .map(|e| entry(e.ledger_id, e.amount))
            .collect();
        let voided_twice = negate_entries(&as_persisted);

        for (original, twice) in original_entries.iter().zip(voided_twice.iter()) {
            assert_eq!(original.ledger_id, twice.ledger_id);
            assert_eq!(original.amount, twice.amount);
        }
    }
}
