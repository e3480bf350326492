//! User data repository for database operations.
//!
//! This module provides the `UserRepository` for managing user records, including the
//! compare-and-swap update that guards every change to a user's credit buckets.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::{
    credit::CreditBalance,
    user::{CreateUserParam, LinkedInAccount, User},
};

/// Repository providing database operations for user management.
pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection or open transaction
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a new user with an empty balance and a trial starting now.
    ///
    /// Trial credits are added afterwards through the ledger so they appear in the
    /// user's credit history.
    ///
    /// # Returns
    /// - `Ok(User)` - The created user
    /// - `Err(DbErr)` - Database error, including a unique violation on email
    pub async fn create(&self, param: CreateUserParam) -> Result<User, DbErr> {
        let now = Utc::now();

        let entity = entity::user::ActiveModel {
            email: ActiveValue::Set(param.email.trim().to_lowercase()),
            name: ActiveValue::Set(param.name),
            admin: ActiveValue::Set(false),
            top_up_credits: ActiveValue::Set(0),
            monthly_credits: ActiveValue::Set(0),
            monthly_credits_reset_at: ActiveValue::Set(None),
            trial_started_at: ActiveValue::Set(now),
            trial_days: ActiveValue::Set(param.trial_days),
            plan_id: ActiveValue::Set(None),
            linkedin_urn: ActiveValue::Set(None),
            linkedin_access_token: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(User::from_entity(entity))
    }

    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find_by_id(user_id)
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds a user by email, compared case-insensitively by storing lower case.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Gets users ordered by id with pagination.
    ///
    /// # Arguments
    /// - `page` - Zero-indexed page number
    /// - `per_page` - Number of users per page
    ///
    /// # Returns
    /// - `Ok((users, total))` - Users for the page and the total user count
    /// - `Err(DbErr)` - Database error during pagination query
    pub async fn get_all_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<User>, u64), DbErr> {
        let paginator = entity::prelude::User::find()
            .order_by_asc(entity::user::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let users = paginator
            .fetch_page(page)
            .await?
            .into_iter()
            .map(User::from_entity)
            .collect();

        Ok((users, total))
    }

    /// Sets admin status for a user.
    ///
    /// # Returns
    /// - `Ok(true)` - User updated
    /// - `Ok(false)` - No user with that id
    pub async fn set_admin(&self, user_id: i32, is_admin: bool) -> Result<bool, DbErr> {
        let result = entity::prelude::User::update_many()
            .col_expr(entity::user::Column::Admin, Expr::value(is_admin))
            .filter(entity::user::Column::Id.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Stores or clears the LinkedIn member linked to a user.
    ///
    /// # Returns
    /// - `Ok(true)` - User updated
    /// - `Ok(false)` - No user with that id
    pub async fn set_linkedin_account(
        &self,
        user_id: i32,
        account: Option<LinkedInAccount>,
    ) -> Result<bool, DbErr> {
        let (urn, access_token) = match account {
            Some(account) => (Some(account.urn), Some(account.access_token)),
            None => (None, None),
        };

        let result = entity::prelude::User::update_many()
            .col_expr(entity::user::Column::LinkedinUrn, Expr::value(urn))
            .col_expr(
                entity::user::Column::LinkedinAccessToken,
                Expr::value(access_token),
            )
            .filter(entity::user::Column::Id.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Replaces both credit buckets only if they still hold `expected`.
    ///
    /// This is the single write path for balances. A concurrent writer that changed
    /// either bucket since `expected` was read makes the update match no rows.
    ///
    /// # Returns
    /// - `Ok(true)` - Balance swapped to `new`
    /// - `Ok(false)` - Balance changed underneath; caller should re-read and retry
    pub async fn compare_and_set_credits(
        &self,
        user_id: i32,
        expected: CreditBalance,
        new: CreditBalance,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::User::update_many()
            .col_expr(entity::user::Column::MonthlyCredits, Expr::value(new.monthly))
            .col_expr(entity::user::Column::TopUpCredits, Expr::value(new.top_up))
            .filter(entity::user::Column::Id.eq(user_id))
            .filter(entity::user::Column::MonthlyCredits.eq(expected.monthly))
            .filter(entity::user::Column::TopUpCredits.eq(expected.top_up))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    pub async fn set_monthly_reset_at(
        &self,
        user_id: i32,
        reset_at: Option<DateTime<Utc>>,
    ) -> Result<(), DbErr> {
        entity::prelude::User::update_many()
            .col_expr(
                entity::user::Column::MonthlyCreditsResetAt,
                Expr::value(reset_at),
            )
            .filter(entity::user::Column::Id.eq(user_id))
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Moves the monthly reset date from `expected` to `next` if it was not moved already.
    ///
    /// Claims a due refresh so that only one caller grants or expires the monthly bucket.
    ///
    /// # Returns
    /// - `Ok(true)` - This caller owns the refresh
    /// - `Ok(false)` - Another caller refreshed first
    pub async fn advance_monthly_reset(
        &self,
        user_id: i32,
        expected: DateTime<Utc>,
        next: Option<DateTime<Utc>>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::User::update_many()
            .col_expr(entity::user::Column::MonthlyCreditsResetAt, Expr::value(next))
            .filter(entity::user::Column::Id.eq(user_id))
            .filter(entity::user::Column::MonthlyCreditsResetAt.eq(expected))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    pub async fn set_plan(&self, user_id: i32, plan_id: Option<i32>) -> Result<(), DbErr> {
        entity::prelude::User::update_many()
            .col_expr(entity::user::Column::PlanId, Expr::value(plan_id))
            .filter(entity::user::Column::Id.eq(user_id))
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Ids of users whose monthly bucket is due for a refresh at `now`.
    pub async fn get_ids_due_for_monthly_reset(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<i32>, DbErr> {
        entity::prelude::User::find()
            .select_only()
            .column(entity::user::Column::Id)
            .filter(entity::user::Column::MonthlyCreditsResetAt.is_not_null())
            .filter(entity::user::Column::MonthlyCreditsResetAt.lte(now))
            .order_by_asc(entity::user::Column::Id)
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }
}
