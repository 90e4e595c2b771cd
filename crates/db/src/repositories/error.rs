//! The repository-boundary error type.
//!
//! Domain validation failures bubble up from `ledgerkeep-core` unchanged;
//! storage-layer faults are wrapped here via `#[from]`, never flattened
//! into a stringly-typed catch-all (§7, §10.2).

use ledgerkeep_core::ledger::LedgerError;
use thiserror::Error;

/// Errors a repository method can return.
#[derive(Debug, Error)]
pub enum RepoError {
    /// A domain validation or state error from `ledgerkeep-core`.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// An opaque storage-layer fault.
    #[error("storage error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl RepoError {
    /// Returns a stable, machine-readable error code, delegating to the
    /// wrapped [`LedgerError`] where applicable.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if the caller may reasonably retry the call unchanged.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Ledger(e) => e.is_retryable(),
            Self::Database(_) => true,
        }
    }
}
