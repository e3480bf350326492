use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CheckoutDto {
    pub plan_slug: String,
    pub coupon_code: Option<String>,
}

/// Everything the client-side checkout widget needs to collect payment.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CheckoutResponseDto {
    pub order_id: i32,
    pub gateway_order_id: String,
    pub key_id: String,
    pub amount_cents: i64,
    pub discount_cents: i64,
    pub currency: String,
    /// `completed` when a coupon reduced the amount to zero.
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct VerifyPaymentDto {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct OrderDto {
    pub id: i32,
    pub plan_id: i32,
    pub amount_cents: i64,
    pub discount_cents: i64,
    pub currency: String,
    pub gateway_order_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct PaymentDto {
    pub id: i32,
    pub order_id: i32,
    pub gateway_payment_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct WebhookAckDto {
    pub status: String,
}
