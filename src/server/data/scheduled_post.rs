//! Scheduled post storage.
//!
//! Status transitions are conditional updates keyed on the current status, so a
//! post can be claimed by exactly one processing pass and cancelled only while it
//! is still pending.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, ExprTrait}, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::{
    error::AppError,
    model::scheduled_post::{CreateScheduledPostParam, PostStatus, ScheduledPost},
};

pub struct ScheduledPostRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ScheduledPostRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: CreateScheduledPostParam) -> Result<ScheduledPost, AppError> {
        let now = Utc::now();

        let entity = entity::scheduled_post::ActiveModel {
            user_id: ActiveValue::Set(param.user_id),
            content: ActiveValue::Set(param.content),
            visibility: ActiveValue::Set(param.visibility.as_str().to_string()),
            scheduled_for: ActiveValue::Set(param.scheduled_for),
            status: ActiveValue::Set(PostStatus::Pending.as_str().to_string()),
            attempts: ActiveValue::Set(0),
            last_error: ActiveValue::Set(None),
            linkedin_post_id: ActiveValue::Set(None),
            credit_transaction_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        ScheduledPost::from_entity(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<ScheduledPost>, AppError> {
        entity::prelude::ScheduledPost::find_by_id(id)
            .one(self.db)
            .await?
            .map(ScheduledPost::from_entity)
            .transpose()
    }

    /// A user's scheduled posts, latest scheduled time first.
    pub async fn get_paginated_by_user(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<ScheduledPost>, u64), AppError> {
        let paginator = entity::prelude::ScheduledPost::find()
            .filter(entity::scheduled_post::Column::UserId.eq(user_id))
            .order_by_desc(entity::scheduled_post::Column::ScheduledFor)
            .order_by_desc(entity::scheduled_post::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let posts = paginator
            .fetch_page(page)
            .await?
            .into_iter()
            .map(ScheduledPost::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((posts, total))
    }

    /// Pending posts whose time has come, oldest first.
    pub async fn get_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<ScheduledPost>, AppError> {
        entity::prelude::ScheduledPost::find()
            .filter(entity::scheduled_post::Column::Status.eq(PostStatus::Pending.as_str()))
            .filter(entity::scheduled_post::Column::ScheduledFor.lte(now))
            .order_by_asc(entity::scheduled_post::Column::ScheduledFor)
            .order_by_asc(entity::scheduled_post::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?
            .into_iter()
            .map(ScheduledPost::from_entity)
            .collect()
    }

    /// Claims a pending post for publishing and counts the attempt.
    ///
    /// # Returns
    /// - `Ok(true)` - This caller owns the post now
    /// - `Ok(false)` - Another pass claimed it, or it was cancelled
    pub async fn claim(&self, id: i32, now: DateTime<Utc>) -> Result<bool, AppError> {
        let result = entity::prelude::ScheduledPost::update_many()
            .col_expr(
                entity::scheduled_post::Column::Status,
                Expr::value(PostStatus::Processing.as_str()),
            )
            .col_expr(
                entity::scheduled_post::Column::Attempts,
                Expr::col(entity::scheduled_post::Column::Attempts).add(1),
            )
            .col_expr(entity::scheduled_post::Column::UpdatedAt, Expr::value(now))
            .filter(entity::scheduled_post::Column::Id.eq(id))
            .filter(entity::scheduled_post::Column::Status.eq(PostStatus::Pending.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Posts claimed before `cutoff` that never reached a final status, oldest first.
    pub async fn get_stale_claims(
        &self,
        cutoff: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<ScheduledPost>, AppError> {
        entity::prelude::ScheduledPost::find()
            .filter(entity::scheduled_post::Column::Status.eq(PostStatus::Processing.as_str()))
            .filter(entity::scheduled_post::Column::UpdatedAt.lt(cutoff))
            .order_by_asc(entity::scheduled_post::Column::UpdatedAt)
            .order_by_asc(entity::scheduled_post::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?
            .into_iter()
            .map(ScheduledPost::from_entity)
            .collect()
    }

    /// Puts a stale claim back to `pending` for the next pass.
    ///
    /// # Returns
    /// - `Ok(true)` - Post is pending again
    /// - `Ok(false)` - Post finished or was touched after `cutoff`
    pub async fn release_stale_claim(
        &self,
        id: i32,
        cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = entity::prelude::ScheduledPost::update_many()
            .col_expr(
                entity::scheduled_post::Column::Status,
                Expr::value(PostStatus::Pending.as_str()),
            )
            .col_expr(entity::scheduled_post::Column::UpdatedAt, Expr::value(now))
            .filter(entity::scheduled_post::Column::Id.eq(id))
            .filter(entity::scheduled_post::Column::Status.eq(PostStatus::Processing.as_str()))
            .filter(entity::scheduled_post::Column::UpdatedAt.lt(cutoff))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Marks a stale claim failed.
    ///
    /// # Returns
    /// - `Ok(true)` - Post is failed
    /// - `Ok(false)` - Post finished or was touched after `cutoff`
    pub async fn fail_stale_claim(
        &self,
        id: i32,
        cutoff: DateTime<Utc>,
        error: &str,
        credit_transaction_id: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = entity::prelude::ScheduledPost::update_many()
            .col_expr(
                entity::scheduled_post::Column::Status,
                Expr::value(PostStatus::Failed.as_str()),
            )
            .col_expr(entity::scheduled_post::Column::LastError, Expr::value(error))
            .col_expr(
                entity::scheduled_post::Column::CreditTransactionId,
                Expr::value(credit_transaction_id),
            )
            .col_expr(entity::scheduled_post::Column::UpdatedAt, Expr::value(now))
            .filter(entity::scheduled_post::Column::Id.eq(id))
            .filter(entity::scheduled_post::Column::Status.eq(PostStatus::Processing.as_str()))
            .filter(entity::scheduled_post::Column::UpdatedAt.lt(cutoff))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    pub async fn mark_posted(
        &self,
        id: i32,
        linkedin_post_id: &str,
        credit_transaction_id: i32,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        entity::prelude::ScheduledPost::update_many()
            .col_expr(
                entity::scheduled_post::Column::Status,
                Expr::value(PostStatus::Posted.as_str()),
            )
            .col_expr(
                entity::scheduled_post::Column::LinkedinPostId,
                Expr::value(linkedin_post_id),
            )
            .col_expr(
                entity::scheduled_post::Column::CreditTransactionId,
                Expr::value(credit_transaction_id),
            )
            .col_expr(
                entity::scheduled_post::Column::LastError,
                Expr::value(Option::<String>::None),
            )
            .col_expr(entity::scheduled_post::Column::UpdatedAt, Expr::value(now))
            .filter(entity::scheduled_post::Column::Id.eq(id))
            .filter(entity::scheduled_post::Column::Status.eq(PostStatus::Processing.as_str()))
            .exec(self.db)
            .await?;
        Ok(())
    }

    pub async fn mark_failed(
        &self,
        id: i32,
        error: &str,
        credit_transaction_id: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        entity::prelude::ScheduledPost::update_many()
            .col_expr(
                entity::scheduled_post::Column::Status,
                Expr::value(PostStatus::Failed.as_str()),
            )
            .col_expr(entity::scheduled_post::Column::LastError, Expr::value(error))
            .col_expr(
                entity::scheduled_post::Column::CreditTransactionId,
                Expr::value(credit_transaction_id),
            )
            .col_expr(entity::scheduled_post::Column::UpdatedAt, Expr::value(now))
            .filter(entity::scheduled_post::Column::Id.eq(id))
            .filter(entity::scheduled_post::Column::Status.eq(PostStatus::Processing.as_str()))
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Cancels a user's post while it is still pending.
    ///
    /// # Returns
    /// - `Ok(true)` - Post cancelled
    /// - `Ok(false)` - No pending post with that id belongs to the user
    pub async fn cancel(
        &self,
        id: i32,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = entity::prelude::ScheduledPost::update_many()
            .col_expr(
                entity::scheduled_post::Column::Status,
                Expr::value(PostStatus::Cancelled.as_str()),
            )
            .col_expr(entity::scheduled_post::Column::UpdatedAt, Expr::value(now))
            .filter(entity::scheduled_post::Column::Id.eq(id))
            .filter(entity::scheduled_post::Column::UserId.eq(user_id))
            .filter(entity::scheduled_post::Column::Status.eq(PostStatus::Pending.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
