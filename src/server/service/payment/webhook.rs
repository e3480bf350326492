use serde::Deserialize;

use crate::server::{
    data::order::OrderRepository,
    error::{payment::PaymentError, AppError},
    model::order::WebhookOutcome,
};

use super::{signature, PaymentService};

#[derive(Deserialize)]
struct WebhookEvent {
    event: String,
    #[serde(default)]
    payload: WebhookPayload,
}

#[derive(Deserialize, Default)]
struct WebhookPayload {
    payment: Option<Wrapped<PaymentEntity>>,
    order: Option<Wrapped<OrderEntity>>,
}

#[derive(Deserialize)]
struct Wrapped<T> {
    entity: T,
}

#[derive(Deserialize)]
struct PaymentEntity {
    id: String,
    order_id: Option<String>,
}

#[derive(Deserialize)]
struct OrderEntity {
    id: String,
}

impl WebhookPayload {
    /// Gateway order id from the order entity, falling back to the payment's order.
    fn gateway_order_id(&self) -> Option<&str> {
        self.order
            .as_ref()
            .map(|order| order.entity.id.as_str())
            .or_else(|| {
                self.payment
                    .as_ref()
                    .and_then(|payment| payment.entity.order_id.as_deref())
            })
    }

    fn gateway_payment_id(&self) -> Option<&str> {
        self.payment.as_ref().map(|payment| payment.entity.id.as_str())
    }
}

impl<'a> PaymentService<'a> {
    /// Handles a gateway webhook delivery.
    ///
    /// The signature header carries `HMAC-SHA256(webhook_secret, body)` over the raw
    /// body. `payment.captured` and `order.paid` complete the order, `payment.failed`
    /// marks a pending order failed and releases its coupon redemption. Other events and
    /// orders this service did not create are acknowledged so the gateway stops
    /// redelivering them.
    ///
    /// # Returns
    /// - `Ok(WebhookOutcome)` - Delivery handled
    /// - `Err(PaymentError::InvalidWebhookSignature)` - Signature missing or wrong
    /// - `Err(PaymentError::MalformedWebhook)` - Body is not a recognizable event
    pub async fn webhook(
        &self,
        body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<WebhookOutcome, AppError> {
        let valid = signature_header.is_some_and(|provided| {
            signature::verify(&self.config.webhook_secret, body, provided)
        });
        if !valid {
            return Err(PaymentError::InvalidWebhookSignature.into());
        }

        let event: WebhookEvent = serde_json::from_slice(body)
            .map_err(|e| PaymentError::MalformedWebhook(e.to_string()))?;

        match event.event.as_str() {
            "payment.captured" | "order.paid" => {
                let (Some(gateway_order_id), Some(gateway_payment_id)) = (
                    event.payload.gateway_order_id(),
                    event.payload.gateway_payment_id(),
                ) else {
                    return Err(PaymentError::MalformedWebhook(format!(
                        "{} without order and payment ids",
                        event.event
                    ))
                    .into());
                };

                match self
                    .complete_order(gateway_order_id, gateway_payment_id)
                    .await
                {
                    Ok(_) => Ok(WebhookOutcome::Processed),
                    Err(AppError::NotFound(_)) => {
                        tracing::warn!(
                            gateway_order_id,
                            event = %event.event,
                            "Webhook for unknown order"
                        );
                        Ok(WebhookOutcome::Ignored)
                    }
                    Err(e) => Err(e),
                }
            }
            "payment.failed" => {
                let Some(gateway_order_id) = event.payload.gateway_order_id() else {
                    return Err(PaymentError::MalformedWebhook(
                        "payment.failed without an order id".to_string(),
                    )
                    .into());
                };

                let order_repo = OrderRepository::new(self.db);
                let Some(order) = order_repo.find_by_gateway_order_id(gateway_order_id).await?
                else {
                    return Ok(WebhookOutcome::Ignored);
                };

                if order_repo.mark_failed(order.id).await? {
                    tracing::info!(order_id = order.id, "Order payment failed");
                    if let Some(coupon_id) = order.coupon_id {
                        self.release_coupon(coupon_id).await;
                    }
                    Ok(WebhookOutcome::Processed)
                } else {
                    Ok(WebhookOutcome::Ignored)
                }
            }
            other => {
                tracing::debug!(event = other, "Ignoring webhook event");
                Ok(WebhookOutcome::Ignored)
            }
        }
    }
}
