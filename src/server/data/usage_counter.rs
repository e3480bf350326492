use sea_orm::{
    sea_query::{Expr, ExprTrait, OnConflict},
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

/// Per-month action counters.
pub struct UsageCounterRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UsageCounterRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Adds one to the counter for `(user_id, month, action)`, creating it at 1.
    pub async fn increment(&self, user_id: i32, month: &str, action: &str) -> Result<(), DbErr> {
        entity::prelude::UsageCounter::insert(entity::usage_counter::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            month: ActiveValue::Set(month.to_string()),
            action: ActiveValue::Set(action.to_string()),
            count: ActiveValue::Set(1),
        })
        .on_conflict(
            OnConflict::columns([
                entity::usage_counter::Column::UserId,
                entity::usage_counter::Column::Month,
                entity::usage_counter::Column::Action,
            ])
            .value(
                entity::usage_counter::Column::Count,
                Expr::col(entity::usage_counter::Column::Count).add(1),
            )
            .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;

        Ok(())
    }

    /// All counters for a user in `month`, ordered by action.
    pub async fn get_by_user_month(
        &self,
        user_id: i32,
        month: &str,
    ) -> Result<Vec<(String, i64)>, DbErr> {
        let counters = entity::prelude::UsageCounter::find()
            .filter(entity::usage_counter::Column::UserId.eq(user_id))
            .filter(entity::usage_counter::Column::Month.eq(month))
            .order_by_asc(entity::usage_counter::Column::Action)
            .all(self.db)
            .await?;

        Ok(counters.into_iter().map(|c| (c.action, c.count)).collect())
    }
}
