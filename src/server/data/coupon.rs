//! Coupon storage and atomic redemption.

use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, ExprTrait}, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::{
    error::AppError,
    model::coupon::{Coupon, CreateCouponParam},
    util::parse::normalize_code,
};

pub struct CouponRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CouponRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Stores a coupon with its code upper-cased.
    pub async fn create(&self, param: CreateCouponParam) -> Result<Coupon, AppError> {
        let entity = entity::coupon::ActiveModel {
            code: ActiveValue::Set(normalize_code(&param.code)),
            discount_kind: ActiveValue::Set(param.discount_kind.as_str().to_string()),
            discount_value: ActiveValue::Set(param.discount_value),
            max_redemptions: ActiveValue::Set(param.max_redemptions),
            redemption_count: ActiveValue::Set(0),
            expires_at: ActiveValue::Set(param.expires_at),
            plan_id: ActiveValue::Set(param.plan_id),
            active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Coupon::from_entity(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Coupon>, AppError> {
        entity::prelude::Coupon::find_by_id(id)
            .one(self.db)
            .await?
            .map(Coupon::from_entity)
            .transpose()
    }

    /// Case-insensitive lookup by code.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, AppError> {
        entity::prelude::Coupon::find()
            .filter(entity::coupon::Column::Code.eq(normalize_code(code)))
            .one(self.db)
            .await?
            .map(Coupon::from_entity)
            .transpose()
    }

    pub async fn get_all_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Coupon>, u64), AppError> {
        let paginator = entity::prelude::Coupon::find()
            .order_by_desc(entity::coupon::Column::CreatedAt)
            .order_by_desc(entity::coupon::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let coupons = paginator
            .fetch_page(page)
            .await?
            .into_iter()
            .map(Coupon::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((coupons, total))
    }

    /// Returns whether a coupon with `id` existed.
    pub async fn set_active(&self, id: i32, active: bool) -> Result<bool, AppError> {
        let result = entity::prelude::Coupon::update_many()
            .col_expr(entity::coupon::Column::Active, Expr::value(active))
            .filter(entity::coupon::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Counts one redemption if the coupon still has redemptions left.
    ///
    /// The limit check and the increment are a single conditional UPDATE, so two
    /// concurrent checkouts cannot both take the last redemption.
    ///
    /// # Returns
    /// - `Ok(true)` - Redemption recorded
    /// - `Ok(false)` - Coupon is exhausted or does not exist
    pub async fn try_redeem(&self, id: i32) -> Result<bool, AppError> {
        let result = entity::prelude::Coupon::update_many()
            .col_expr(
                entity::coupon::Column::RedemptionCount,
                Expr::col(entity::coupon::Column::RedemptionCount).add(1),
            )
            .filter(entity::coupon::Column::Id.eq(id))
            .filter(
                Condition::any()
                    .add(entity::coupon::Column::MaxRedemptions.is_null())
                    .add(
                        Expr::col(entity::coupon::Column::RedemptionCount)
                            .lt(Expr::col(entity::coupon::Column::MaxRedemptions)),
                    ),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Gives back one redemption taken by `try_redeem`.
    ///
    /// # Returns
    /// - `Ok(true)` - Redemption released
    /// - `Ok(false)` - Nothing to release or unknown coupon
    pub async fn release(&self, id: i32) -> Result<bool, AppError> {
        let result = entity::prelude::Coupon::update_many()
            .col_expr(
                entity::coupon::Column::RedemptionCount,
                Expr::col(entity::coupon::Column::RedemptionCount).sub(1),
            )
            .filter(entity::coupon::Column::Id.eq(id))
            .filter(entity::coupon::Column::RedemptionCount.gt(0))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
