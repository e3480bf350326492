use crate::server::{
    data::{
        coupon::CouponRepository, order::OrderRepository, subscription::SubscriptionRepository,
        user::UserRepository,
    },
    error::{payment::PaymentError, AppError},
    model::{
        credit::CreditBalance,
        order::{CheckoutParam, CompletionOutcome, OrderStatus, VerifyPaymentParam, WebhookOutcome},
    },
    service::payment::{signature, PaymentService},
};
use chrono::Utc;
use serde_json::json;
use test_utils::{builder::TestBuilder, factory};

use super::{razorpay_config, StubGateway};

mod checkout;
mod complete_order;
mod verify;
mod webhook;

fn checkout_param(user_id: i32, plan_slug: &str, coupon_code: Option<&str>) -> CheckoutParam {
    CheckoutParam {
        user_id,
        plan_slug: plan_slug.to_string(),
        coupon_code: coupon_code.map(str::to_string),
    }
}

fn signed_verification(user_id: i32, gateway_order_id: &str, payment_id: &str) -> VerifyPaymentParam {
    let payload = signature::payment_payload(gateway_order_id, payment_id);
    VerifyPaymentParam {
        user_id,
        gateway_order_id: gateway_order_id.to_string(),
        gateway_payment_id: payment_id.to_string(),
        signature: signature::sign("key_secret", payload.as_bytes()),
    }
}
