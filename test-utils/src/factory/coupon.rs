//! Coupon factory for creating test coupon entities.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test coupons.
///
/// Defaults to an active, unlimited, non-expiring 10 percent coupon.
pub struct CouponFactory<'a> {
    db: &'a DatabaseConnection,
    code: String,
    discount_kind: String,
    discount_value: i64,
    max_redemptions: Option<i32>,
    redemption_count: i32,
    expires_at: Option<DateTime<Utc>>,
    plan_id: Option<i32>,
    active: bool,
}

impl<'a> CouponFactory<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            code: format!("SAVE{}", next_id()),
            discount_kind: "percent".to_string(),
            discount_value: 10,
            max_redemptions: None,
            redemption_count: 0,
            expires_at: None,
            plan_id: None,
            active: true,
        }
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn percent(mut self, value: i64) -> Self {
        self.discount_kind = "percent".to_string();
        self.discount_value = value;
        self
    }

    pub fn fixed(mut self, cents: i64) -> Self {
        self.discount_kind = "fixed".to_string();
        self.discount_value = cents;
        self
    }

    pub fn max_redemptions(mut self, max: i32) -> Self {
        self.max_redemptions = Some(max);
        self
    }

    pub fn redemption_count(mut self, count: i32) -> Self {
        self.redemption_count = count;
        self
    }

    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn plan_id(mut self, plan_id: i32) -> Self {
        self.plan_id = Some(plan_id);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub async fn build(self) -> Result<entity::coupon::Model, DbErr> {
        entity::coupon::ActiveModel {
            code: ActiveValue::Set(self.code.to_uppercase()),
            discount_kind: ActiveValue::Set(self.discount_kind),
            discount_value: ActiveValue::Set(self.discount_value),
            max_redemptions: ActiveValue::Set(self.max_redemptions),
            redemption_count: ActiveValue::Set(self.redemption_count),
            expires_at: ActiveValue::Set(self.expires_at),
            plan_id: ActiveValue::Set(self.plan_id),
            active: ActiveValue::Set(self.active),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active 10 percent coupon.
pub async fn create_coupon(db: &DatabaseConnection) -> Result<entity::coupon::Model, DbErr> {
    CouponFactory::new(db).build().await
}
