use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::{
    error::AppError,
    model::subscription::{Subscription, SubscriptionStatus},
};

pub struct SubscriptionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SubscriptionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: i32,
        plan_id: i32,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Result<Subscription, AppError> {
        let entity = entity::subscription::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            plan_id: ActiveValue::Set(plan_id),
            status: ActiveValue::Set(SubscriptionStatus::Active.as_str().to_string()),
            current_period_start: ActiveValue::Set(period_start),
            current_period_end: ActiveValue::Set(period_end),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Subscription::from_entity(entity)
    }

    /// The subscription covering `now`, if the user has one.
    ///
    /// When several overlap the one ending last wins.
    pub async fn find_active_for_user(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<Subscription>, AppError> {
        entity::prelude::Subscription::find()
            .filter(entity::subscription::Column::UserId.eq(user_id))
            .filter(
                entity::subscription::Column::Status.eq(SubscriptionStatus::Active.as_str()),
            )
            .filter(entity::subscription::Column::CurrentPeriodEnd.gt(now))
            .order_by_desc(entity::subscription::Column::CurrentPeriodEnd)
            .one(self.db)
            .await?
            .map(Subscription::from_entity)
            .transpose()
    }

    pub async fn extend(&self, id: i32, period_end: DateTime<Utc>) -> Result<(), AppError> {
        entity::prelude::Subscription::update_many()
            .col_expr(
                entity::subscription::Column::CurrentPeriodEnd,
                Expr::value(period_end),
            )
            .filter(entity::subscription::Column::Id.eq(id))
            .exec(self.db)
            .await?;
        Ok(())
    }

    pub async fn set_status(&self, id: i32, status: SubscriptionStatus) -> Result<(), AppError> {
        entity::prelude::Subscription::update_many()
            .col_expr(
                entity::subscription::Column::Status,
                Expr::value(status.as_str()),
            )
            .filter(entity::subscription::Column::Id.eq(id))
            .exec(self.db)
            .await?;
        Ok(())
    }
}
