//! Checkout orders and the payments that complete them.

use chrono::{DateTime, Utc};

use crate::{
    model::payment::{CheckoutResponseDto, OrderDto, PaymentDto, WebhookAckDto},
    server::{error::AppError, util::parse::parse_stored},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Completed,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub plan_id: i32,
    pub coupon_id: Option<i32>,
    pub amount_cents: i64,
    pub discount_cents: i64,
    pub currency: String,
    pub gateway_order_id: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn into_dto(self) -> OrderDto {
        OrderDto {
            id: self.id,
            plan_id: self.plan_id,
            amount_cents: self.amount_cents,
            discount_cents: self.discount_cents,
            currency: self.currency,
            gateway_order_id: self.gateway_order_id,
            status: self.status.as_str().to_string(),
            created_at: self.created_at,
            completed_at: self.completed_at,
        }
    }

    pub fn from_entity(entity: entity::order::Model) -> Result<Self, AppError> {
        let status = parse_stored("order.status", &entity.status, OrderStatus::parse)?;

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            plan_id: entity.plan_id,
            coupon_id: entity.coupon_id,
            amount_cents: entity.amount_cents,
            discount_cents: entity.discount_cents,
            currency: entity.currency,
            gateway_order_id: entity.gateway_order_id,
            status,
            created_at: entity.created_at,
            completed_at: entity.completed_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: i32,
    pub order_id: i32,
    pub user_id: i32,
    pub gateway_payment_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn into_dto(self) -> PaymentDto {
        PaymentDto {
            id: self.id,
            order_id: self.order_id,
            gateway_payment_id: self.gateway_payment_id,
            amount_cents: self.amount_cents,
            currency: self.currency,
            created_at: self.created_at,
        }
    }

    pub fn from_entity(entity: entity::payment::Model) -> Self {
        Self {
            id: entity.id,
            order_id: entity.order_id,
            user_id: entity.user_id,
            gateway_payment_id: entity.gateway_payment_id,
            amount_cents: entity.amount_cents,
            currency: entity.currency,
            created_at: entity.created_at,
        }
    }
}

/// Parameters for persisting a new pending order.
#[derive(Debug, Clone)]
pub struct CreateOrderParam {
    pub user_id: i32,
    pub plan_id: i32,
    pub coupon_id: Option<i32>,
    pub amount_cents: i64,
    pub discount_cents: i64,
    pub currency: String,
    pub gateway_order_id: String,
}

/// Parameters for starting a checkout.
#[derive(Debug, Clone)]
pub struct CheckoutParam {
    pub user_id: i32,
    pub plan_slug: String,
    pub coupon_code: Option<String>,
}

/// Order created by checkout plus the public gateway key for the payment widget.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutResult {
    pub order: Order,
    pub key_id: String,
}

impl CheckoutResult {
    pub fn into_dto(self) -> CheckoutResponseDto {
        CheckoutResponseDto {
            order_id: self.order.id,
            gateway_order_id: self.order.gateway_order_id,
            key_id: self.key_id,
            amount_cents: self.order.amount_cents,
            discount_cents: self.order.discount_cents,
            currency: self.order.currency,
            status: self.order.status.as_str().to_string(),
        }
    }
}

/// Parameters for the client-side payment confirmation.
#[derive(Debug, Clone)]
pub struct VerifyPaymentParam {
    pub user_id: i32,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

/// Result of trying to complete an order.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    /// This call moved the order to completed and granted the purchase.
    Completed(Order),
    /// The order had already been completed by an earlier call.
    AlreadyCompleted(Order),
}

impl CompletionOutcome {
    pub fn order(self) -> Order {
        match self {
            Self::Completed(order) | Self::AlreadyCompleted(order) => order,
        }
    }
}

/// How a gateway webhook delivery was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The event changed an order.
    Processed,
    /// The event was acknowledged without any change.
    Ignored,
}

impl WebhookOutcome {
    pub fn into_dto(self) -> WebhookAckDto {
        let status = match self {
            Self::Processed => "processed",
            Self::Ignored => "ignored",
        };
        WebhookAckDto {
            status: status.to_string(),
        }
    }
}
