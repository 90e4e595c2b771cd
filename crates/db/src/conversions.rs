//! Conversions between persisted `SeaORM` models and the storage-agnostic
//! domain shapes in `ledgerkeep-core`.

use ledgerkeep_core::ledger::{EvidenceRef, Ledger, LedgerBalance, LedgerEntry, Transaction};

use crate::entities::{evidence_links, ledger_balances, ledger_entries, ledgers, transactions};

impl From<ledgers::Model> for Ledger {
    fn from(m: ledgers::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            number: m.number,
            description: m.description,
            increased_by_debits: m.increased_by_debits,
            created_at: m.created_at,
            modified_at: m.modified_at,
        }
    }
}

impl From<transactions::Model> for Transaction {
    fn from(m: transactions::Model) -> Self {
        Self {
            id: m.id,
            transaction_id: m.transaction_id,
            created_by: m.created_by,
            notes: m.notes,
            posted_at: m.posted_at,
            transaction_type_id: m.transaction_type_id,
            voids: m.voids,
            created_at: m.created_at,
            modified_at: m.modified_at,
        }
    }
}

impl From<ledger_entries::Model> for LedgerEntry {
    fn from(m: ledger_entries::Model) -> Self {
        Self {
            entry_id: m.entry_id,
            transaction_id: m.transaction_id,
            ledger_id: m.ledger_id,
            amount: m.amount,
            created_at: m.created_at,
            modified_at: m.modified_at,
        }
    }
}

impl From<evidence_links::Model> for EvidenceRef {
    fn from(m: evidence_links::Model) -> Self {
        Self { type_tag: m.evidence_type_tag, id: m.evidence_id }
    }
}

impl From<ledger_balances::Model> for LedgerBalance {
    fn from(m: ledger_balances::Model) -> Self {
        Self {
            id: m.id,
            ledger_id: m.ledger_id,
            evidence: EvidenceRef { type_tag: m.evidence_type_tag, id: m.evidence_id },
            balance: m.balance,
            created_at: m.created_at,
            modified_at: m.modified_at,
        }
    }
}
