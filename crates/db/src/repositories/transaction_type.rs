//! Repository for `TransactionType` rows, including the lazily-provisioned
//! `"Manual"` default (§3, §9).

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};

use ledgerkeep_core::ledger::MANUAL_TRANSACTION_TYPE;

use crate::entities::transaction_types;

/// Finds the `"Manual"` transaction type, creating it if this is the
/// first use in this database. Safe under concurrent first use: a unique
/// constraint on `name` guarantees at most one row is ever committed, and
/// a losing concurrent insert is retried as a lookup.
///
/// # Errors
/// Returns [`DbErr`] on a storage fault.
pub async fn get_or_create_manual_transaction_type<C: ConnectionTrait>(
    db: &C,
) -> Result<transaction_types::Model, DbErr> {
    get_or_create_transaction_type(db, MANUAL_TRANSACTION_TYPE, "Default transaction type for manually posted transactions.").await
}

/// Finds a transaction type by name, creating it with `description` if
/// absent. Safe under concurrent first use via the unique constraint on
/// `name`.
///
/// # Errors
/// Returns [`DbErr`] on a storage fault.
pub async fn get_or_create_transaction_type<C: ConnectionTrait>(
    db: &C,
    name: &str,
    description: &str,
) -> Result<transaction_types::Model, DbErr> {
    if let Some(existing) = transaction_types::Entity::find()
        .filter(transaction_types::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let model = transaction_types::ActiveModel {
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(inserted) => Ok(inserted),
        Err(_conflict) => transaction_types::Entity::find()
            .filter(transaction_types::Column::Name.eq(name))
            .one(db)
            .await?
            .ok_or(_conflict),
    }
}

/// Resolves `transaction_type_id` to a concrete, existing id: if `Some`,
/// validates the row exists; if `None`, provisions/looks up `"Manual"`.
///
/// # Errors
/// Returns [`DbErr`] on a storage fault or if an explicit id does not
/// reference an existing transaction type.
pub async fn get_or_create_transaction_type_by_id_or_manual<C: ConnectionTrait>(
    db: &C,
    transaction_type_id: Option<i64>,
) -> Result<i64, DbErr> {
    match transaction_type_id {
        Some(id) => transaction_types::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(|m| m.id)
            .ok_or_else(|| DbErr::RecordNotFound(format!("transaction type {id} not found"))),
        None => get_or_create_manual_transaction_type(db).await.map(|m| m.id),
    }
}
