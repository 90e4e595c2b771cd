//! Repository implementing the posting engine (§4.2), the void engine
//! (§4.3), the evidence query engine (§4.4), and the non-void filter
//! (§4.5).
//!
//! Pure decisions (balance validation, void-entry negation, evidence-set
//! predicates) are delegated to `ledgerkeep-core`; this module only adds
//! the storage I/O: lock acquisition, transactional writes, and query
//! composition.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, Set,
    Statement, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use ledgerkeep_core::ledger::types::{CreateTransactionInput, EvidenceRef, MatchType, VoidTransactionInput};
use ledgerkeep_core::ledger::{posting, void, LedgerError};

use crate::entities::{evidence_links, ledger_entries, transactions};
use crate::repositories::error::RepoError;
use crate::repositories::transaction_type::get_or_create_transaction_type_by_id_or_manual;

/// Data-access layer for `transactions`, `ledger_entries`, and
/// `evidence_links`.
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Builds a repository over the given connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a new, balanced transaction (§4.2).
    ///
    /// # Errors
    /// Returns [`LedgerError::NoLedgerEntries`], [`LedgerError::TransactionBalance`],
    /// [`LedgerError::ExistingLedgerEntries`], or a wrapped storage fault.
    #[instrument(skip(self, input), fields(ledger_count, evidence_count = input.evidence.len()))]
    pub async fn create_transaction(
        &self,
        mut input: CreateTransactionInput,
    ) -> Result<ledgerkeep_core::ledger::Transaction, RepoError> {
        debug!("validating transaction before acquiring locks");
        posting::validate_posting(&mut input)?;

        let txn = self.db.begin().await?;
        let result = create_transaction_in_txn(&txn, input).await;
        match result {
            Ok(transaction) => {
                txn.commit().await?;
                info!(transaction_id = %transaction.transaction_id, "transaction posted");
                Ok(transaction)
            }
            Err(e) => {
                txn.rollback().await?;
                warn!(error = %e, "transaction rejected, rolled back");
                Err(e)
            }
        }
    }

    /// Voids `transaction_id` (the primary key, not the UUID), producing a
    /// new transaction with negated entries and the same evidence (§4.3).
    ///
    /// # Errors
    /// Returns [`LedgerError::UnvoidableTransaction`] if the target has
    /// already been voided, or a wrapped storage fault.
    #[instrument(skip(self, void_input))]
    pub async fn void_transaction(
        &self,
        transaction_id: i64,
        void_input: VoidTransactionInput,
    ) -> Result<ledgerkeep_core::ledger::Transaction, RepoError> {
        let txn = self.db.begin().await?;

        let voided = transactions::Entity::find_by_id(transaction_id)
            .one(&txn)
            .await?
            .ok_or_else(|| RepoError::Ledger(LedgerError::Internal(format!(
                "transaction {transaction_id} not found"
            ))))?;

        let already_voided = transactions::Entity::find()
            .filter(transactions::Column::Voids.eq(voided.id))
            .count(&txn)
            .await?
            > 0;
        if already_voided {
            txn.rollback().await?;
            return Err(RepoError::Ledger(LedgerError::UnvoidableTransaction {
                transaction_id: voided.transaction_id,
            }));
        }

        let entries: Vec<ledger_entries::Model> = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::TransactionId.eq(voided.id))
            .all(&txn)
            .await?;
        let entries: Vec<ledgerkeep_core::ledger::LedgerEntry> =
            entries.into_iter().map(Into::into).collect();

        let evidence: Vec<evidence_links::Model> = evidence_links::Entity::find()
            .filter(evidence_links::Column::TransactionId.eq(voided.id))
            .all(&txn)
            .await?;
        let evidence: Vec<EvidenceRef> = evidence.into_iter().map(Into::into).collect();

        let voided_domain: ledgerkeep_core::ledger::Transaction = voided.clone().into();
        let mut create_input = void::build_void_input(&voided_domain, &entries, evidence, &void_input);

        if let Err(e) = posting::validate_posting(&mut create_input) {
            txn.rollback().await?;
            return Err(e.into());
        }

        let result = create_transaction_in_txn(&txn, create_input).await;
        let voiding = match result {
            Ok(t) => t,
            Err(e) => {
                txn.rollback().await?;
                return Err(e);
            }
        };

        // Link the voiding transaction back to the voided one.
        let mut active: transactions::ActiveModel =
            transactions::Entity::find_by_id(voiding.id).one(&txn).await?.unwrap().into();
        active.voids = Set(Some(voided.id));
        active.modified_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        info!(
            voided_transaction_id = %voided.transaction_id,
            voiding_transaction_id = %updated.transaction_id,
            "transaction voided"
        );
        Ok(updated.into())
    }

    /// Returns the transaction with the given internal primary key, if any.
    ///
    /// # Errors
    /// Returns a wrapped storage fault.
    pub async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<ledgerkeep_core::ledger::Transaction>, RepoError> {
        Ok(transactions::Entity::find_by_id(id).one(&self.db).await?.map(Into::into))
    }

    /// Returns the evidence set of the given transaction.
    ///
    /// # Errors
    /// Returns a wrapped storage fault.
    pub async fn evidence_for(&self, transaction_id: i64) -> Result<HashSet<EvidenceRef>, RepoError> {
        let rows = evidence_links::Entity::find()
            .filter(evidence_links::Column::TransactionId.eq(transaction_id))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Returns the ledger entries of the given transaction.
    ///
    /// # Errors
    /// Returns a wrapped storage fault.
    pub async fn entries_for(
        &self,
        transaction_id: i64,
    ) -> Result<Vec<ledgerkeep_core::ledger::LedgerEntry>, RepoError> {
        let rows = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::TransactionId.eq(transaction_id))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Filters transactions by evidence set under the given match mode
    /// (§4.4). `ANY`/`ALL`/`NONE` each compose into a single query over the
    /// evidence-links table (cost constant in `|E|`); `EXACT` narrows with
    /// the same `ALL` query, then performs one in-memory comparison per
    /// surviving transaction, never a full table scan when `E` is
    /// non-empty.
    ///
    /// # Errors
    /// Returns [`LedgerError::InvalidMatchType`] (unreachable given the
    /// typed [`MatchType`] parameter, but kept to mirror the documented
    /// failure mode) or a wrapped storage fault.
    #[instrument(skip(self, evidence))]
    pub async fn filter_by_related_objects(
        &self,
        evidence: &[EvidenceRef],
        match_type: MatchType,
    ) -> Result<Vec<ledgerkeep_core::ledger::Transaction>, RepoError> {
        if evidence.is_empty() {
            return match match_type {
                MatchType::Any | MatchType::All | MatchType::None => {
                    Ok(transactions::Entity::find()
                        .order_by_asc(transactions::Column::Id)
                        .all(&self.db)
                        .await?
                        .into_iter()
                        .map(Into::into)
                        .collect())
                }
                MatchType::Exact => self.transactions_with_no_evidence().await,
            };
        }

        match match_type {
            MatchType::Any => self.filter_any(evidence).await,
            MatchType::All => self.filter_all(evidence).await,
            MatchType::None => self.filter_none(evidence).await,
            MatchType::Exact => self.filter_exact(evidence).await,
        }
    }

    async fn filter_any(
        &self,
        evidence: &[EvidenceRef],
    ) -> Result<Vec<ledgerkeep_core::ledger::Transaction>, RepoError> {
        let mut condition = sea_orm::Condition::any();
        for e in evidence {
            condition = condition.add(
                evidence_links::Column::EvidenceTypeTag
                    .eq(e.type_tag.clone())
                    .and(evidence_links::Column::EvidenceId.eq(e.id)),
            );
        }

        let transaction_ids: Vec<i64> = evidence_links::Entity::find()
            .filter(condition)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|l| l.transaction_id)
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        self.transactions_by_ids(&transaction_ids).await
    }

    /// Composes `E ⊆ Tev` into a single query: one round-trip restricts
    /// `evidence_links` to rows matching any item of `E`, groups by
    /// `transaction_id`, and keeps only groups whose distinct-match count
    /// equals `|E|` (deduplicated) — i.e. every item of `E` was found.
    /// Cost is constant in `|E|` (§4.4), not one query per evidence item.
    async fn filter_all(
        &self,
        evidence: &[EvidenceRef],
    ) -> Result<Vec<ledgerkeep_core::ledger::Transaction>, RepoError> {
        #[derive(FromQueryResult)]
        struct Row {
            transaction_id: i64,
        }

        let distinct: Vec<EvidenceRef> = evidence.iter().cloned().collect::<HashSet<_>>().into_iter().collect();
        let required = distinct.len();

        let mut placeholders = Vec::with_capacity(distinct.len());
        let mut values: Vec<sea_orm::Value> = Vec::with_capacity(distinct.len() * 2);
        for (i, e) in distinct.iter().enumerate() {
            let base = i * 2;
            placeholders.push(format!("(${}, ${})", base + 1, base + 2));
            values.push(e.type_tag.clone().into());
            values.push(e.id.into());
        }

        let sql = format!(
            "SELECT transaction_id FROM evidence_links \
             WHERE (evidence_type_tag, evidence_id) IN ({}) \
             GROUP BY transaction_id \
             HAVING COUNT(DISTINCT (evidence_type_tag, evidence_id)) = {required} \
             ORDER BY transaction_id",
            placeholders.join(", "),
        );

        let rows = Row::find_by_statement(Statement::from_sql_and_values(DbBackend::Postgres, &sql, values))
            .all(&self.db)
            .await?;
        let ids: Vec<i64> = rows.into_iter().map(|r| r.transaction_id).collect();

        self.transactions_by_ids(&ids).await
    }

    async fn filter_none(
        &self,
        evidence: &[EvidenceRef],
    ) -> Result<Vec<ledgerkeep_core::ledger::Transaction>, RepoError> {
        let excluded = self.filter_any(evidence).await?;
        let excluded_ids: HashSet<i64> = excluded.iter().map(|t| t.id).collect();

        Ok(transactions::Entity::find()
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::<ledgerkeep_core::ledger::Transaction>::into)
            .filter(|t| !excluded_ids.contains(&t.id))
            .collect())
    }

    /// Narrows with the same constant-cost `ALL` predicate, then issues one
    /// query per surviving candidate to fetch its full evidence set for the
    /// final equality check — cost is `O(1)` to narrow plus `O(candidates)`
    /// to confirm, never a full table scan when `E` is non-empty.
    async fn filter_exact(
        &self,
        evidence: &[EvidenceRef],
    ) -> Result<Vec<ledgerkeep_core::ledger::Transaction>, RepoError> {
        let e: HashSet<EvidenceRef> = evidence.iter().cloned().collect();
        let candidates = self.filter_all(evidence).await?;

        let mut exact = Vec::new();
        for candidate in candidates {
            let tev = self.evidence_for(candidate.id).await?;
            if ledgerkeep_core::ledger::evidence::matches(&tev, &e, MatchType::Exact) {
                exact.push(candidate);
            }
        }
        Ok(exact)
    }

    async fn transactions_with_no_evidence(
        &self,
    ) -> Result<Vec<ledgerkeep_core::ledger::Transaction>, RepoError> {
        let linked: HashSet<i64> = evidence_links::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|l| l.transaction_id)
            .collect();

        Ok(transactions::Entity::find()
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::<ledgerkeep_core::ledger::Transaction>::into)
            .filter(|t| !linked.contains(&t.id))
            .collect())
    }

    async fn transactions_by_ids(
        &self,
        ids: &[i64],
    ) -> Result<Vec<ledgerkeep_core::ledger::Transaction>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(transactions::Entity::find()
            .filter(transactions::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// The non-void filter (§4.5): transactions that are neither voids nor
    /// have been voided.
    ///
    /// # Errors
    /// Returns a wrapped storage fault.
    pub async fn non_void(&self) -> Result<Vec<ledgerkeep_core::ledger::Transaction>, RepoError> {
        let voided_ids: HashSet<i64> = transactions::Entity::find()
            .filter(transactions::Column::Voids.is_not_null())
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|t| t.voids)
            .collect();

        Ok(transactions::Entity::find()
            .filter(transactions::Column::Voids.is_null())
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::<ledgerkeep_core::ledger::Transaction>::into)
            .filter(|t| !voided_ids.contains(&t.id))
            .collect())
    }
}

/// Runs the ordered steps of §4.2 inside an already-open transaction.
/// Shared by `create_transaction` and `void_transaction` (which posts the
/// voiding transaction through the same procedure before linking it back).
async fn create_transaction_in_txn(
    txn: &DatabaseTransaction,
    mut input: CreateTransactionInput,
) -> Result<ledgerkeep_core::ledger::Transaction, RepoError> {
    posting::validate_posting(&mut input)?;

    // Step 1-2: collect distinct ledger ids, lock in ascending order.
    let ledger_ids = posting::distinct_ledger_ids_ascending(&input.entries);
    lock_ledgers_ascending(txn, &ledger_ids).await?;

    let posted_at = input.posted_at.unwrap_or_else(Utc::now);
    let transaction_type_id =
        get_or_create_transaction_type_by_id_or_manual(txn, input.transaction_type_id).await?;

    // Step 4: insert the transaction row.
    let now = Utc::now();
    let transaction_active = transactions::ActiveModel {
        transaction_id: Set(Uuid::new_v4()),
        created_by: Set(input.user.clone()),
        notes: Set(input.notes.clone()),
        posted_at: Set(posted_at),
        transaction_type_id: Set(transaction_type_id),
        voids: Set(None),
        created_at: Set(now),
        modified_at: Set(now),
        ..Default::default()
    };
    let transaction = transaction_active.insert(txn).await?;

    // Step 5: per (ledger, evidence) pair, atomic UPDATE-then-INSERT.
    for entry in &input.entries {
        for evidence in &input.evidence {
            upsert_ledger_balance(txn, entry.ledger_id, evidence, entry.amount).await?;
        }
    }

    // Step 6: bulk-insert the ledger entries.
    if !input.entries.is_empty() {
        let entry_models: Vec<ledger_entries::ActiveModel> = input
            .entries
            .iter()
            .map(|e| ledger_entries::ActiveModel {
                entry_id: Set(Uuid::new_v4()),
                transaction_id: Set(transaction.id),
                ledger_id: Set(e.ledger_id),
                amount: Set(e.amount),
                created_at: Set(now),
                modified_at: Set(now),
            })
            .collect();
        ledger_entries::Entity::insert_many(entry_models).exec(txn).await?;
    }

    // Step 7: bulk-insert the evidence links.
    if !input.evidence.is_empty() {
        let link_models: Vec<evidence_links::ActiveModel> = input
            .evidence
            .iter()
            .map(|e| evidence_links::ActiveModel {
                transaction_id: Set(transaction.id),
                evidence_type_tag: Set(e.type_tag.clone()),
                evidence_id: Set(e.id),
                created_at: Set(now),
                ..Default::default()
            })
            .collect();
        evidence_links::Entity::insert_many(link_models).exec(txn).await?;
    }

    Ok(transaction.into())
}

/// Acquires row-level write locks on `ledger_ids` in ascending order,
/// serializing concurrent postings/rebuilds that touch overlapping ledger
/// sets and preventing deadlocks (§4.2 step 2).
async fn lock_ledgers_ascending(
    txn: &DatabaseTransaction,
    ledger_ids: &[i64],
) -> Result<(), sea_orm::DbErr> {
    if ledger_ids.is_empty() {
        return Ok(());
    }
    let id_list = ledger_ids.iter().map(i64::to_string).collect::<Vec<_>>().join(",");
    let sql = format!("SELECT id FROM ledgers WHERE id IN ({id_list}) ORDER BY id FOR UPDATE");
    txn.query_all(Statement::from_string(DbBackend::Postgres, sql)).await?;
    Ok(())
}

/// Attempts `UPDATE ... SET balance = balance + amount`; inserts a fresh
/// row with `balance = amount` if no row was affected. Relies on the
/// per-ledger lock already held plus the unique constraint on
/// `(ledger, evidence_type_tag, evidence_id)`.
async fn upsert_ledger_balance(
    txn: &DatabaseTransaction,
    ledger_id: i64,
    evidence: &EvidenceRef,
    amount: rust_decimal::Decimal,
) -> Result<(), sea_orm::DbErr> {
    use crate::entities::ledger_balances::{self, Column};

    let now = Utc::now();
    let update_result = ledger_balances::Entity::update_many()
        .col_expr(Column::Balance, Expr::col(Column::Balance).add(amount))
        .col_expr(Column::ModifiedAt, Expr::value(now))
        .filter(
            Column::LedgerId
                .eq(ledger_id)
                .and(Column::EvidenceTypeTag.eq(evidence.type_tag.clone()))
                .and(Column::EvidenceId.eq(evidence.id)),
        )
        .exec(txn)
        .await?;

    debug_assert!(update_result.rows_affected <= 1, "at most one balance row per (ledger, evidence) pair");

    if update_result.rows_affected == 0 {
        let model = ledger_balances::ActiveModel {
            ledger_id: Set(ledger_id),
            evidence_type_tag: Set(evidence.type_tag.clone()),
            evidence_id: Set(evidence.id),
            balance: Set(amount),
            created_at: Set(now),
            modified_at: Set(now),
            ..Default::default()
        };
        model.insert(txn).await?;
    }

    Ok(())
}
