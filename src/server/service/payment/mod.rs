//! Payment service for checkout, confirmation and gateway webhooks.
//!
//! This module provides the `PaymentService`, which opens gateway orders for plan
//! purchases and completes them once the gateway confirms payment. Completion can be
//! triggered twice for the same order (client-side verify and the webhook) and grants
//! the purchase exactly once.
//!
//! The implementation is split across submodules:
//! - `checkout` - Plan and coupon pricing, gateway order creation
//! - `completion` - Order completion and credit or subscription grants
//! - `webhook` - Webhook signature check and event dispatch
//! - `signature` - HMAC-SHA256 signing helpers

mod checkout;
mod completion;
mod webhook;

pub mod signature;

use sea_orm::DatabaseConnection;

use crate::server::{
    config::RazorpayConfig,
    data::payment::PaymentRepository,
    error::{payment::PaymentError, AppError},
    model::order::{CompletionOutcome, Payment, VerifyPaymentParam},
    service::gateway::PaymentGateway,
};

/// Service providing business logic for purchases.
pub struct PaymentService<'a> {
    db: &'a DatabaseConnection,
    gateway: &'a dyn PaymentGateway,
    config: &'a RazorpayConfig,
}

impl<'a> PaymentService<'a> {
    /// Creates a new PaymentService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `gateway` - Gateway used to open orders
    /// - `config` - Secrets used to check payment and webhook signatures
    pub fn new(
        db: &'a DatabaseConnection,
        gateway: &'a dyn PaymentGateway,
        config: &'a RazorpayConfig,
    ) -> Self {
        Self {
            db,
            gateway,
            config,
        }
    }

    /// Confirms a payment reported by the client-side widget.
    ///
    /// The widget returns `HMAC-SHA256(key_secret, "{order_id}|{payment_id}")` which
    /// proves the gateway captured the payment.
    ///
    /// # Returns
    /// - `Ok(CompletionOutcome)` - Order completed now or earlier
    /// - `Err(PaymentError::InvalidSignature)` - Signature does not match
    /// - `Err(AppError::NotFound)` - Order unknown or owned by another user
    pub async fn verify(&self, param: VerifyPaymentParam) -> Result<CompletionOutcome, AppError> {
        let payload = signature::payment_payload(&param.gateway_order_id, &param.gateway_payment_id);
        if !signature::verify(&self.config.key_secret, payload.as_bytes(), &param.signature) {
            tracing::warn!(
                user_id = param.user_id,
                gateway_order_id = %param.gateway_order_id,
                "Rejected payment with invalid signature"
            );
            return Err(PaymentError::InvalidSignature(param.gateway_order_id).into());
        }

        self.complete_for_user(
            param.user_id,
            &param.gateway_order_id,
            &param.gateway_payment_id,
        )
        .await
    }

    /// A user's completed payments, newest first.
    pub async fn list_payments(&self, user_id: i32) -> Result<Vec<Payment>, AppError> {
        let payments = PaymentRepository::new(self.db).get_by_user(user_id).await?;
        Ok(payments)
    }
}
