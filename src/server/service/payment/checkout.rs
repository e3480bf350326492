use chrono::Utc;

use crate::server::{
    data::{coupon::CouponRepository, order::OrderRepository},
    error::AppError,
    model::order::{CheckoutParam, CheckoutResult, CreateOrderParam},
    service::{coupon::CouponService, plan::PlanService},
};

use super::PaymentService;

impl<'a> PaymentService<'a> {
    /// Starts a plan purchase.
    ///
    /// Prices the plan with the optional coupon, opens a gateway order for the payable
    /// amount and stores it as pending. When a coupon covers the whole price no gateway
    /// order is opened and the order completes immediately.
    ///
    /// A coupon redemption is reserved here rather than at completion, so checkouts
    /// beyond the coupon's limit are refused up front. The reservation is given back
    /// if the order cannot be opened or its payment fails.
    ///
    /// # Returns
    /// - `Ok(CheckoutResult)` - Stored order and the gateway key id for the widget
    /// - `Err(AppError::NotFound)` - Unknown plan or coupon
    /// - `Err(AppError::BadRequest)` - Coupon cannot be applied to the plan or has no
    ///   redemptions left
    /// - `Err(AppError::Upstream)` - Gateway rejected the order
    pub async fn checkout(&self, param: CheckoutParam) -> Result<CheckoutResult, AppError> {
        let plan = PlanService::new(self.db).get_by_slug(&param.plan_slug).await?;

        let coupon_code = param
            .coupon_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());
        let (coupon_id, discount_cents) = match coupon_code {
            Some(code) => {
                let quote = CouponService::new(self.db).validate(code, &plan.slug).await?;
                (Some(quote.coupon.id), quote.discount_cents)
            }
            None => (None, 0),
        };

        if let Some(coupon_id) = coupon_id {
            if !CouponRepository::new(self.db).try_redeem(coupon_id).await? {
                return Err(AppError::BadRequest(
                    "Coupon has no redemptions left".to_string(),
                ));
            }
        }

        let amount_cents = (plan.price_cents - discount_cents).max(0);
        let receipt = format!("u{}-{}", param.user_id, Utc::now().timestamp_millis());

        let created = async {
            let gateway_order_id = if amount_cents == 0 {
                format!("free_{}", receipt)
            } else {
                self.gateway
                    .create_order(amount_cents, &plan.currency, &receipt)
                    .await?
                    .id
            };

            OrderRepository::new(self.db)
                .create(CreateOrderParam {
                    user_id: param.user_id,
                    plan_id: plan.id,
                    coupon_id,
                    amount_cents,
                    discount_cents,
                    currency: plan.currency.clone(),
                    gateway_order_id,
                })
                .await
        }
        .await;

        let order = match created {
            Ok(order) => order,
            Err(e) => {
                if let Some(coupon_id) = coupon_id {
                    self.release_coupon(coupon_id).await;
                }
                return Err(e);
            }
        };

        tracing::info!(
            user_id = param.user_id,
            order_id = order.id,
            plan = %plan.slug,
            amount_cents,
            "Created checkout order"
        );

        let key_id = self.gateway.key_id().to_string();

        if amount_cents == 0 {
            let payment_id = format!("free_{}", order.id);
            let order = self
                .complete_order(&order.gateway_order_id, &payment_id)
                .await?
                .order();
            return Ok(CheckoutResult { order, key_id });
        }

        Ok(CheckoutResult { order, key_id })
    }
}

impl<'a> PaymentService<'a> {
    /// Gives back a coupon redemption reserved for an order that will not be paid.
    ///
    /// Failures are logged only; the caller's outcome does not depend on them.
    pub(super) async fn release_coupon(&self, coupon_id: i32) {
        match CouponRepository::new(self.db).release(coupon_id).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!(coupon_id, "No coupon redemption to release"),
            Err(e) => tracing::error!(coupon_id, "Failed to release coupon redemption: {}", e),
        }
    }
}
