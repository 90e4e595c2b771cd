//! The `transaction_types` table: user-defined grouping tags.
//!
//! The `"Manual"` row is lazily get-or-created on first use of the
//! default type; see `repositories::transaction_type::get_or_create_manual_transaction_type`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A transaction type row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_types")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique name, e.g. `"Manual"`.
    #[sea_orm(unique)]
    pub name: String,
    /// Free-text description.
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A type may label many transactions.
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
