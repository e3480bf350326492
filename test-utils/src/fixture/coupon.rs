//! Coupon fixtures for creating in-memory test data.

use chrono::{DateTime, TimeZone, Utc};
use entity::coupon;

/// Creates an active, unlimited 10 percent coupon entity.
pub fn entity() -> coupon::Model {
    entity_builder().build()
}

/// Creates a coupon entity builder for customization.
///
/// # Example
///
/// ```rust,ignore
/// let coupon = fixture::coupon::entity_builder()
///     .fixed(5000)
///     .max_redemptions(1)
///     .build();
/// ```
pub fn entity_builder() -> CouponEntityBuilder {
    CouponEntityBuilder {
        model: coupon::Model {
            id: 1,
            code: "LAUNCH10".to_string(),
            discount_kind: "percent".to_string(),
            discount_value: 10,
            max_redemptions: None,
            redemption_count: 0,
            expires_at: None,
            plan_id: None,
            active: true,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        },
    }
}

/// Builder for in-memory coupon entities.
pub struct CouponEntityBuilder {
    model: coupon::Model,
}

impl CouponEntityBuilder {
    pub fn percent(mut self, value: i64) -> Self {
        self.model.discount_kind = "percent".to_string();
        self.model.discount_value = value;
        self
    }

    pub fn fixed(mut self, cents: i64) -> Self {
        self.model.discount_kind = "fixed".to_string();
        self.model.discount_value = cents;
        self
    }

    pub fn max_redemptions(mut self, max: i32) -> Self {
        self.model.max_redemptions = Some(max);
        self
    }

    pub fn redemption_count(mut self, count: i32) -> Self {
        self.model.redemption_count = count;
        self
    }

    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.model.expires_at = Some(expires_at);
        self
    }

    pub fn plan_id(mut self, plan_id: i32) -> Self {
        self.model.plan_id = Some(plan_id);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.model.active = active;
        self
    }

    pub fn build(self) -> coupon::Model {
        self.model
    }
}
