//! Checkout order storage.
//!
//! Order status only moves forward from `pending`, and each transition is a
//! conditional UPDATE so the verify call and the webhook cannot both complete
//! the same order.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::{
    error::AppError,
    model::order::{CreateOrderParam, Order, OrderStatus},
};

pub struct OrderRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OrderRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Persists a pending order.
    pub async fn create(&self, param: CreateOrderParam) -> Result<Order, AppError> {
        let entity = entity::order::ActiveModel {
            user_id: ActiveValue::Set(param.user_id),
            plan_id: ActiveValue::Set(param.plan_id),
            coupon_id: ActiveValue::Set(param.coupon_id),
            amount_cents: ActiveValue::Set(param.amount_cents),
            discount_cents: ActiveValue::Set(param.discount_cents),
            currency: ActiveValue::Set(param.currency),
            gateway_order_id: ActiveValue::Set(param.gateway_order_id),
            status: ActiveValue::Set(OrderStatus::Pending.as_str().to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            completed_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Order::from_entity(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Order>, AppError> {
        entity::prelude::Order::find_by_id(id)
            .one(self.db)
            .await?
            .map(Order::from_entity)
            .transpose()
    }

    pub async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Order>, AppError> {
        entity::prelude::Order::find()
            .filter(entity::order::Column::GatewayOrderId.eq(gateway_order_id))
            .one(self.db)
            .await?
            .map(Order::from_entity)
            .transpose()
    }

    pub async fn get_by_user(&self, user_id: i32) -> Result<Vec<Order>, AppError> {
        entity::prelude::Order::find()
            .filter(entity::order::Column::UserId.eq(user_id))
            .order_by_desc(entity::order::Column::CreatedAt)
            .order_by_desc(entity::order::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Order::from_entity)
            .collect()
    }

    /// Moves a pending or failed order to completed.
    ///
    /// A failed order can still complete because the gateway accepts further payment
    /// attempts against the same order after one fails.
    ///
    /// # Returns
    /// - `Ok(true)` - This call completed the order
    /// - `Ok(false)` - The order was already completed
    pub async fn mark_completed(&self, id: i32, now: DateTime<Utc>) -> Result<bool, AppError> {
        self.transition(
            id,
            &[OrderStatus::Pending, OrderStatus::Failed],
            OrderStatus::Completed,
            Some(now),
        )
        .await
    }

    /// Moves a pending order to failed. Completed orders are left untouched.
    pub async fn mark_failed(&self, id: i32) -> Result<bool, AppError> {
        self.transition(id, &[OrderStatus::Pending], OrderStatus::Failed, None)
            .await
    }

    async fn transition(
        &self,
        id: i32,
        from: &[OrderStatus],
        to: OrderStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<bool, AppError> {
        let result = entity::prelude::Order::update_many()
            .col_expr(entity::order::Column::Status, Expr::value(to.as_str()))
            .col_expr(entity::order::Column::CompletedAt, Expr::value(completed_at))
            .filter(entity::order::Column::Id.eq(id))
            .filter(entity::order::Column::Status.is_in(from.iter().map(|s| s.as_str())))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
