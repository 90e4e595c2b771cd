//! The `ledger_entries` table: one signed amount against one ledger inside
//! one transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A ledger entry row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    /// Opaque stable id; the primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub entry_id: Uuid,
    /// Parent transaction.
    #[sea_orm(indexed)]
    pub transaction_id: i64,
    /// Target ledger.
    #[sea_orm(indexed)]
    pub ledger_id: i64,
    /// Signed amount, `DECIMAL(24,4)`, rounded per §4.1 on ingestion.
    #[sea_orm(column_type = "Decimal(Some((24, 4)))")]
    pub amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub modified_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The parent transaction.
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id",
        on_delete = "Cascade"
    )]
    Transaction,
    /// The target ledger.
    #[sea_orm(
        belongs_to = "super::ledgers::Entity",
        from = "Column::LedgerId",
        to = "super::ledgers::Column::Id"
    )]
    Ledger,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl Related<super::ledgers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ledger.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
