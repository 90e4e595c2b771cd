//! Repository for the `ledger_balances` table: point lookups and the full
//! rebuild operation (§4.6).

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Statement,
    TransactionTrait,
};
use tracing::{info, instrument};

use crate::entities::ledger_balances;
use crate::repositories::error::RepoError;

/// Clears every row of `ledger_balances` and recomputes it from
/// `ledger_entries` joined with `evidence_links`.
const TRUNCATE_SQL: &str = "TRUNCATE TABLE ledger_balances";

/// Discards rows with no evidence: a balance keyed on `(ledger, evidence)`
/// is meaningless without evidence, so the rebuild must not materialize
/// one (§9, resolving the corresponding Open Question).
const REBUILD_SQL: &str = "
INSERT INTO ledger_balances (ledger_id, evidence_type_tag, evidence_id, balance, created_at, modified_at)
SELECT
    le.ledger_id,
    el.evidence_type_tag,
    el.evidence_id,
    SUM(le.amount),
    now(),
    now()
FROM ledger_entries le
JOIN evidence_links el ON el.transaction_id = le.transaction_id
GROUP BY le.ledger_id, el.evidence_type_tag, el.evidence_id
";

/// Data-access layer for `ledger_balances`.
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Builds a repository over the given connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns every denormalized balance recorded against `evidence`
    /// across all ledgers.
    ///
    /// # Errors
    /// Returns a wrapped storage fault.
    pub async fn get_balances_for_object(
        &self,
        evidence_type_tag: &str,
        evidence_id: i64,
    ) -> Result<Vec<ledgerkeep_core::ledger::LedgerBalance>, RepoError> {
        Ok(ledger_balances::Entity::find()
            .filter(
                ledger_balances::Column::EvidenceTypeTag
                    .eq(evidence_type_tag)
                    .and(ledger_balances::Column::EvidenceId.eq(evidence_id)),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Returns the single denormalized balance for `(ledger_id, evidence)`,
    /// if one exists.
    ///
    /// # Errors
    /// Returns a wrapped storage fault.
    pub async fn get_balance(
        &self,
        ledger_id: i64,
        evidence_type_tag: &str,
        evidence_id: i64,
    ) -> Result<Decimal, RepoError> {
        let row = ledger_balances::Entity::find()
            .filter(
                ledger_balances::Column::LedgerId
                    .eq(ledger_id)
                    .and(ledger_balances::Column::EvidenceTypeTag.eq(evidence_type_tag))
                    .and(ledger_balances::Column::EvidenceId.eq(evidence_id)),
            )
            .one(&self.db)
            .await?;
        Ok(row.map_or(Decimal::ZERO, |r| r.balance))
    }

    /// Rebuilds `ledger_balances` from scratch: locks every ledger in
    /// ascending id order, truncates the table, and recomputes every row
    /// from `ledger_entries` joined with `evidence_links` (§4.6).
    ///
    /// Rows with no evidence are discarded rather than rebuilt, since a
    /// `(ledger, evidence)` balance is not meaningful without evidence.
    ///
    /// # Errors
    /// Returns a wrapped storage fault.
    #[instrument(skip(self))]
    pub async fn rebuild_ledger_balances(&self) -> Result<(), RepoError> {
        let txn = self.db.begin().await?;

        txn.query_all(Statement::from_string(
            txn.get_database_backend(),
            "SELECT id FROM ledgers ORDER BY id FOR UPDATE".to_owned(),
        ))
        .await?;

        txn.execute(Statement::from_string(txn.get_database_backend(), TRUNCATE_SQL.to_owned()))
            .await?;
        txn.execute(Statement::from_string(txn.get_database_backend(), REBUILD_SQL.to_owned()))
            .await?;

        txn.commit().await?;
        info!("ledger balances rebuilt");
        Ok(())
    }
}
