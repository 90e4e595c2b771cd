//! The `ledger_balances` table: the denormalized running total for a
//! `(ledger, evidence)` pair. Authoritative invariant and maintenance are
//! described in §3 and §4.2/§4.6 of the design notes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A ledger balance row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_balances")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The ledger this balance is for.
    #[sea_orm(indexed)]
    pub ledger_id: i64,
    /// The evidence's type tag.
    pub evidence_type_tag: String,
    /// The evidence's id.
    pub evidence_id: i64,
    /// Running total, `DECIMAL(24,4)`.
    #[sea_orm(column_type = "Decimal(Some((24, 4)))")]
    pub balance: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub modified_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The ledger this balance is for.
    #[sea_orm(
        belongs_to = "super::ledgers::Entity",
        from = "Column::LedgerId",
        to = "super::ledgers::Column::Id"
    )]
    Ledger,
}

impl Related<super::ledgers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ledger.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
