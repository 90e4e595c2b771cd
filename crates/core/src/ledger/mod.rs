//! Double-entry bookkeeping logic.
//!
//! This module implements the storage-agnostic core of the ledger:
//! - Fixed-point amount rounding and the credit/debit sign convention
//!   (`amount`).
//! - The domain shapes postings, voids, and queries operate on (`types`).
//! - The domain error taxonomy (`error`).
//! - Pure validation for the posting engine (`posting`).
//! - Pure transformation logic for the void engine (`void`).
//! - Pure predicate logic for the evidence query engine (`evidence`).
//!
//! The database-backed operations in `ledgerkeep-db` call into this module for
//! every decision that does not require storage I/O, so those decisions
//! stay unit-testable without a database.

pub mod amount;
pub mod error;
pub mod evidence;
pub mod posting;
pub mod types;
pub mod void;

pub use amount::{round_amount, SignConvention, AMOUNT_SCALE};
pub use error::LedgerError;
pub use types::{
    CreateTransactionInput, EvidenceRef, Ledger, LedgerBalance, LedgerEntry, MatchType,
    NewLedgerEntry, Transaction, TransactionType, VoidTransactionInput, MANUAL_TRANSACTION_TYPE,
};
