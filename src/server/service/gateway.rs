//! Payment gateway seam.
//!
//! Checkout only needs the gateway to open an order; payment capture happens in the
//! client widget and is reported back through the verify call and the webhook.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::server::{config::RazorpayConfig, error::AppError};

/// Order opened with the payment gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayOrder {
    pub id: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key id handed to the client-side payment widget.
    fn key_id(&self) -> &str;

    /// Opens an order for `amount_cents` in the currency's minor unit.
    ///
    /// # Arguments
    /// - `amount_cents` - Amount to collect, greater than zero
    /// - `currency` - ISO currency code
    /// - `receipt` - Merchant reference stored with the gateway order
    async fn create_order(
        &self,
        amount_cents: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, AppError>;
}

/// Razorpay Orders API client.
pub struct RazorpayGateway {
    http_client: reqwest::Client,
    config: RazorpayConfig,
}

#[derive(Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Deserialize)]
struct CreateOrderResponse {
    id: String,
}

impl RazorpayGateway {
    pub fn new(http_client: reqwest::Client, config: RazorpayConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> &str {
        &self.config.key_id
    }

    async fn create_order(
        &self,
        amount_cents: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, AppError> {
        let url = format!("{}/v1/orders", self.config.api_base.trim_end_matches('/'));

        let response = self
            .http_client
            .post(url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&CreateOrderRequest {
                amount: amount_cents,
                currency,
                receipt,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                service: "Payment gateway",
                message: format!("order creation returned {}: {}", status, body),
            });
        }

        let order: CreateOrderResponse = response.json().await?;
        tracing::debug!(gateway_order_id = %order.id, receipt, "Opened gateway order");

        Ok(GatewayOrder { id: order.id })
    }
}
