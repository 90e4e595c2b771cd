//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for `ledgers`, `transaction_types`,
//!   `transactions`, `ledger_entries`, `evidence_links`, and
//!   `ledger_balances`
//! - Repository abstractions implementing the posting, void, query, and
//!   rebuild engines
//! - Database migrations
//! - Conversions from persisted models to `ledgerkeep-core` domain types
//! - An equality assertion helper for use in downstream test suites

pub mod assertions;
pub mod conversions;
pub mod entities;
pub mod migration;
pub mod repositories;

pub use assertions::assert_transaction_in_ledgers_for_amounts_with_evidence;
pub use repositories::{BalanceRepository, LedgerRepository, LedgerRepositoryError, RepoError, TransactionRepository};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Establishes a connection pool using the given configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &ledgerkeep_shared::config::DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8));
    Database::connect(options).await
}
