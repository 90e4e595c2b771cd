//! The `evidence_links` table (`TransactionRelatedObject` in the design
//! notes): the many-to-many link from a transaction to an opaque external
//! domain object, identified by `(evidence_type_tag, evidence_id)`.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An evidence link row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "evidence_links")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Parent transaction.
    #[sea_orm(indexed)]
    pub transaction_id: i64,
    /// The embedder's name for the evidence's domain type.
    pub evidence_type_tag: String,
    /// The evidence object's id within its own domain.
    pub evidence_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
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
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
