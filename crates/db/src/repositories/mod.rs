//! Repository abstractions for data access.
//!
//! Repositories hide `SeaORM` details behind plain async methods returning
//! storage-agnostic `ledgerkeep-core` types, so callers never see an
//! entity `Model` directly.

pub mod balance;
pub mod error;
pub mod ledger;
pub mod transaction;
pub mod transaction_type;

pub use balance::BalanceRepository;
pub use error::RepoError;
pub use ledger::{LedgerRepository, LedgerRepositoryError};
pub use transaction::TransactionRepository;
