//! Repository for `Ledger` rows.
//!
//! Ledgers are created and owned by the embedder (§1); this repository
//! offers the minimal CRUD the engine itself needs plus the on-demand
//! per-ledger balance query (§4.8).

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect, Set};

use crate::entities::{ledger_entries, ledgers};

/// Errors returned by [`LedgerRepository`].
#[derive(Debug, thiserror::Error)]
pub enum LedgerRepositoryError {
    /// The requested ledger does not exist.
    #[error("ledger {0} not found")]
    NotFound(i64),
    /// An opaque storage-layer fault.
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Data-access layer for the `ledgers` table.
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Builds a repository over the given connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new ledger (account). The embedder is responsible for
    /// choosing `number`, `name`, and `increased_by_debits`.
    ///
    /// # Errors
    /// Returns [`LedgerRepositoryError::Database`] on a storage fault,
    /// including a unique-constraint violation on `name`/`number`.
    pub async fn create(
        &self,
        name: &str,
        number: i64,
        description: &str,
        increased_by_debits: bool,
    ) -> Result<ledgers::Model, LedgerRepositoryError> {
        let now = Utc::now();
        let model = ledgers::ActiveModel {
            name: Set(name.to_string()),
            number: Set(number),
            description: Set(description.to_string()),
            increased_by_debits: Set(increased_by_debits),
            created_at: Set(now),
            modified_at: Set(now),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Finds a ledger by primary key.
    ///
    /// # Errors
    /// Returns [`LedgerRepositoryError::NotFound`] if no such ledger
    /// exists, or [`LedgerRepositoryError::Database`] on a storage fault.
    pub async fn find_by_id(&self, id: i64) -> Result<ledgers::Model, LedgerRepositoryError> {
        ledgers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(LedgerRepositoryError::NotFound(id))
    }

    /// Returns the signed sum of all entries in this ledger, irrespective
    /// of evidence (§4.8). Computed on demand, never denormalized.
    ///
    /// # Errors
    /// Returns [`LedgerRepositoryError::Database`] on a storage fault.
    pub async fn get_balance(&self, ledger_id: i64) -> Result<Decimal, LedgerRepositoryError> {
        #[derive(Debug, sea_orm::FromQueryResult)]
        struct Sum {
            total: Option<Decimal>,
        }

        let sum = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::LedgerId.eq(ledger_id))
            .select_only()
            .column_as(ledger_entries::Column::Amount.sum(), "total")
            .into_model::<Sum>()
            .one(&self.db)
            .await?;

        Ok(sum.and_then(|s| s.total).unwrap_or(Decimal::ZERO))
    }
}
