//! `SeaORM` entity definitions for the bookkeeping engine's tables.

pub mod evidence_links;
pub mod ledger_balances;
pub mod ledger_entries;
pub mod ledgers;
pub mod transaction_types;
pub mod transactions;
