//! Order factory for creating pending checkout orders.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test orders.
///
/// Defaults to a `pending` order for the plan's full price with no coupon.
pub struct OrderFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: i32,
    plan_id: i32,
    coupon_id: Option<i32>,
    amount_cents: i64,
    discount_cents: i64,
    gateway_order_id: String,
    status: String,
}

impl<'a> OrderFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, user_id: i32, plan: &entity::plan::Model) -> Self {
        Self {
            db,
            user_id,
            plan_id: plan.id,
            coupon_id: None,
            amount_cents: plan.price_cents,
            discount_cents: 0,
            gateway_order_id: format!("order_test{}", next_id()),
            status: "pending".to_string(),
        }
    }

    pub fn coupon_id(mut self, coupon_id: i32) -> Self {
        self.coupon_id = Some(coupon_id);
        self
    }

    pub fn amount_cents(mut self, amount_cents: i64) -> Self {
        self.amount_cents = amount_cents;
        self
    }

    pub fn gateway_order_id(mut self, id: impl Into<String>) -> Self {
        self.gateway_order_id = id.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub async fn build(self) -> Result<entity::order::Model, DbErr> {
        entity::order::ActiveModel {
            user_id: ActiveValue::Set(self.user_id),
            plan_id: ActiveValue::Set(self.plan_id),
            coupon_id: ActiveValue::Set(self.coupon_id),
            amount_cents: ActiveValue::Set(self.amount_cents),
            discount_cents: ActiveValue::Set(self.discount_cents),
            currency: ActiveValue::Set("INR".to_string()),
            gateway_order_id: ActiveValue::Set(self.gateway_order_id),
            status: ActiveValue::Set(self.status),
            created_at: ActiveValue::Set(Utc::now()),
            completed_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a pending order for the plan's full price.
pub async fn create_order(
    db: &DatabaseConnection,
    user_id: i32,
    plan: &entity::plan::Model,
) -> Result<entity::order::Model, DbErr> {
    OrderFactory::new(db, user_id, plan).build().await
}
