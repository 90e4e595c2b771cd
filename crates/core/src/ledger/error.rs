//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur during posting, voiding,
//! and querying the ledger, grouped by concern: validation, transaction
//! state, concurrency, and storage.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// The entries on a transaction do not sum to zero.
    #[error("transaction is not balanced: entries sum to {sum}, expected 0")]
    TransactionBalance {
        /// The actual (non-zero) sum of the entries' signed amounts.
        sum: Decimal,
    },

    /// A transaction was posted with no ledger entries.
    #[error("transaction must have at least one ledger entry")]
    NoLedgerEntries,

    /// One or more entries passed to `create_transaction` were already persisted.
    #[error("entry {entry_id} is already persisted and cannot be posted again")]
    ExistingLedgerEntries {
        /// The id of the already-persisted entry.
        entry_id: Uuid,
    },

    /// `credit`/`debit` was given a negative magnitude.
    #[error("amount must be non-negative, got {amount}")]
    InvalidAmount {
        /// The offending (negative) amount.
        amount: Decimal,
    },

    // ========== Void Errors ==========
    /// A transaction that has already been voided was voided again.
    #[error("transaction {transaction_id} has already been voided")]
    UnvoidableTransaction {
        /// The id of the transaction that was already voided.
        transaction_id: Uuid,
    },

    // ========== Query Errors ==========
    /// `filter_by_related_objects` was given an unrecognized match mode.
    #[error("invalid match type: {0}")]
    InvalidMatchType(String),

    // ========== Storage Errors ==========
    /// An opaque storage-layer fault (lost connection, unexpected constraint
    /// violation from a race the engine did not anticipate).
    #[error("storage error: {0}")]
    Database(String),

    /// Any other internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns a stable, machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TransactionBalance { .. } => "TRANSACTION_BALANCE",
            Self::NoLedgerEntries => "NO_LEDGER_ENTRIES",
            Self::ExistingLedgerEntries { .. } => "EXISTING_LEDGER_ENTRIES",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::UnvoidableTransaction { .. } => "UNVOIDABLE_TRANSACTION",
            Self::InvalidMatchType(_) => "INVALID_MATCH_TYPE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may reasonably retry the call unchanged.
    ///
    /// Validation failures are deterministic and never retryable; only
    /// opaque storage faults might clear up on their own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
