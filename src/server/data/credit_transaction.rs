//! Append-only credit ledger storage.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::server::{
    error::AppError,
    model::credit::{CreditTransaction, NewCreditTransaction},
};

pub struct CreditTransactionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CreditTransactionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Appends a ledger row.
    ///
    /// `delta` and `balance_after` are derived from the bucket deltas and snapshot.
    ///
    /// # Returns
    /// - `Ok(CreditTransaction)` - The stored row
    /// - `Err(AppError::DbErr)` - Database error; a unique violation means the
    ///   idempotency key or reversed transaction was already used
    pub async fn create(&self, param: NewCreditTransaction) -> Result<CreditTransaction, AppError> {
        let stored_key = param
            .idempotency_key
            .as_deref()
            .map(|key| scoped_key(param.user_id, key));

        let entity = entity::credit_transaction::ActiveModel {
            user_id: ActiveValue::Set(param.user_id),
            action: ActiveValue::Set(param.action.as_str().to_string()),
            delta: ActiveValue::Set(param.monthly_delta + param.top_up_delta),
            monthly_delta: ActiveValue::Set(param.monthly_delta),
            top_up_delta: ActiveValue::Set(param.top_up_delta),
            monthly_after: ActiveValue::Set(param.balance_after.monthly),
            top_up_after: ActiveValue::Set(param.balance_after.top_up),
            balance_after: ActiveValue::Set(param.balance_after.available()),
            idempotency_key: ActiveValue::Set(stored_key),
            reverses_id: ActiveValue::Set(param.reverses_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        from_stored(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<CreditTransaction>, AppError> {
        entity::prelude::CreditTransaction::find_by_id(id)
            .one(self.db)
            .await?
            .map(from_stored)
            .transpose()
    }

    /// Finds the deduction a user already made under `key`.
    pub async fn find_by_idempotency_key(
        &self,
        user_id: i32,
        key: &str,
    ) -> Result<Option<CreditTransaction>, AppError> {
        entity::prelude::CreditTransaction::find()
            .filter(entity::credit_transaction::Column::UserId.eq(user_id))
            .filter(
                entity::credit_transaction::Column::IdempotencyKey.eq(scoped_key(user_id, key)),
            )
            .one(self.db)
            .await?
            .map(from_stored)
            .transpose()
    }

    /// Finds the refund that reversed `transaction_id`, if any.
    pub async fn find_reversal_of(
        &self,
        transaction_id: i32,
    ) -> Result<Option<CreditTransaction>, AppError> {
        entity::prelude::CreditTransaction::find()
            .filter(entity::credit_transaction::Column::ReversesId.eq(transaction_id))
            .one(self.db)
            .await?
            .map(from_stored)
            .transpose()
    }

    /// Gets a user's ledger newest first with pagination.
    ///
    /// # Returns
    /// - `Ok((transactions, total))` - Rows for the page and the user's total row count
    pub async fn get_paginated_by_user(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<CreditTransaction>, u64), AppError> {
        let paginator = entity::prelude::CreditTransaction::find()
            .filter(entity::credit_transaction::Column::UserId.eq(user_id))
            .order_by_desc(entity::credit_transaction::Column::CreatedAt)
            .order_by_desc(entity::credit_transaction::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let transactions = paginator
            .fetch_page(page)
            .await?
            .into_iter()
            .map(from_stored)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((transactions, total))
    }
}

/// Idempotency keys are stored as `{user_id}:{key}` so each user has their own key space.
fn scoped_key(user_id: i32, key: &str) -> String {
    format!("{}:{}", user_id, key)
}

fn from_stored(entity: entity::credit_transaction::Model) -> Result<CreditTransaction, AppError> {
    let mut transaction = CreditTransaction::from_entity(entity)?;

    let prefix = format!("{}:", transaction.user_id);
    transaction.idempotency_key = transaction
        .idempotency_key
        .map(|key| match key.strip_prefix(&prefix) {
            Some(key) => key.to_string(),
            None => key,
        });

    Ok(transaction)
}
