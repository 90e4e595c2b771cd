//! The `transactions` table: one balanced financial event per row.
//!
//! `voids` is a unique, nullable self-referencing foreign key: the
//! one-to-one void link described in §9 of the design notes. The reverse
//! (voided-by) direction is looked up with a query rather than a second
//! relation variant, since SeaORM cannot derive both ends of a
//! self-referencing belongs-to automatically.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transaction row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Opaque stable id exposed to embedders.
    #[sea_orm(unique)]
    pub transaction_id: Uuid,
    /// Opaque reference to the user who recorded the transaction.
    pub created_by: String,
    /// Free-text notes.
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    /// Semantic time of the event; may be backdated.
    #[sea_orm(indexed)]
    pub posted_at: DateTime<Utc>,
    /// The transaction's type.
    pub transaction_type_id: i64,
    /// If this transaction voids another, that transaction's primary key.
    /// Unique: at most one transaction may void any given transaction.
    #[sea_orm(unique)]
    pub voids: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub modified_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The transaction's type.
    #[sea_orm(
        belongs_to = "super::transaction_types::Entity",
        from = "Column::TransactionTypeId",
        to = "super::transaction_types::Column::Id"
    )]
    TransactionType,
    /// The transaction this one voids, if any.
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::Voids",
        to = "Column::Id"
    )]
    Voids,
    /// This transaction's entries.
    #[sea_orm(has_many = "super::ledger_entries::Entity")]
    LedgerEntries,
    /// This transaction's evidence links.
    #[sea_orm(has_many = "super::evidence_links::Entity")]
    EvidenceLinks,
}

impl Related<super::transaction_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionType.def()
    }
}

impl Related<super::ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntries.def()
    }
}

impl Related<super::evidence_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvidenceLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
