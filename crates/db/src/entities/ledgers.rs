//! The `ledgers` table: one row per account.
//!
//! Ledgers are created and owned by the embedder; the engine never
//! deletes one. `id` also serves as the lock granule for postings and
//! rebuild (§4.2, §4.6 of the design).

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A ledger (account) row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledgers")]
pub struct Model {
    /// Primary key; also the lock granule ordering key.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique display name.
    #[sea_orm(unique)]
    pub name: String,
    /// Unique account number assigned by the embedder.
    #[sea_orm(unique)]
    pub number: i64,
    /// Free-text description.
    pub description: String,
    /// `true` for asset/expense accounts; `false` for liability/equity/revenue.
    pub increased_by_debits: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub modified_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A ledger has many ledger entries.
    #[sea_orm(has_many = "super::ledger_entries::Entity")]
    LedgerEntries,
    /// A ledger has many denormalized balances.
    #[sea_orm(has_many = "super::ledger_balances::Entity")]
    LedgerBalances,
}

impl Related<super::ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntries.def()
    }
}

impl Related<super::ledger_balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerBalances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
