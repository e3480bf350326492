use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CouponDto {
    pub id: i32,
    pub code: String,
    /// `percent` or `fixed`.
    pub discount_kind: String,
    pub discount_value: i64,
    pub max_redemptions: Option<i32>,
    pub redemption_count: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub plan_id: Option<i32>,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CreateCouponDto {
    pub code: String,
    pub discount_kind: String,
    pub discount_value: i64,
    pub max_redemptions: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub plan_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct PaginatedCouponsDto {
    pub coupons: Vec<CouponDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ValidateCouponDto {
    pub code: String,
    pub plan_slug: String,
}

/// Price breakdown for a plan with a coupon applied.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CouponQuoteDto {
    pub code: String,
    pub plan_slug: String,
    pub price_cents: i64,
    pub discount_cents: i64,
    pub payable_cents: i64,
    pub currency: String,
}
