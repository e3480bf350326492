use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, TransactionTrait};

use crate::server::{
    data::{
        coupon::CouponRepository, is_unique_violation, order::OrderRepository,
        payment::PaymentRepository, plan::PlanRepository, subscription::SubscriptionRepository,
        user::UserRepository,
    },
    error::AppError,
    model::{
        credit::CreditAction,
        order::{CompletionOutcome, OrderStatus},
        plan::{Plan, PlanKind},
        subscription::SubscriptionStatus,
    },
    service::credit::ledger::Ledger,
    util::time::{months_after, next_anniversary_after},
};

use super::PaymentService;

impl<'a> PaymentService<'a> {
    /// Completes an order the user owns.
    pub(super) async fn complete_for_user(
        &self,
        user_id: i32,
        gateway_order_id: &str,
        gateway_payment_id: &str,
    ) -> Result<CompletionOutcome, AppError> {
        let owned = OrderRepository::new(self.db)
            .find_by_gateway_order_id(gateway_order_id)
            .await?
            .is_some_and(|order| order.user_id == user_id);
        if !owned {
            return Err(AppError::NotFound(format!("Order {} not found", gateway_order_id)));
        }

        self.complete_order(gateway_order_id, gateway_payment_id).await
    }

    /// Marks an order paid and grants what it bought.
    ///
    /// Runs in one transaction: the status swap, the payment record and the grant. A
    /// coupon order that failed earlier takes its redemption back here. Top-up plans add their credits to the top-up
    /// bucket. Subscription plans start a subscription with a monthly grant, or extend
    /// the active subscription to the same plan by one month.
    ///
    /// # Returns
    /// - `Ok(CompletionOutcome::Completed)` - This call completed the order
    /// - `Ok(CompletionOutcome::AlreadyCompleted)` - Completed earlier, nothing granted
    /// - `Err(AppError::NotFound)` - Unknown gateway order id
    /// - `Err(AppError::Conflict)` - Payment id already recorded for another order
    pub async fn complete_order(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
    ) -> Result<CompletionOutcome, AppError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;
        let order_repo = OrderRepository::new(&txn);

        let order = order_repo
            .find_by_gateway_order_id(gateway_order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", gateway_order_id)))?;

        if !order_repo.mark_completed(order.id, now).await? {
            txn.commit().await?;
            tracing::debug!(order_id = order.id, "Order already completed");
            return Ok(CompletionOutcome::AlreadyCompleted(order));
        }

        match PaymentRepository::new(&txn)
            .create(&order, gateway_payment_id)
            .await
        {
            Ok(_) => {}
            Err(ref e) if is_unique_violation(e) => {
                return Err(AppError::Conflict(format!(
                    "Payment {} was already recorded",
                    gateway_payment_id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        // The redemption reserved at checkout was released when the payment failed.
        if let (Some(coupon_id), OrderStatus::Failed) = (order.coupon_id, order.status) {
            if !CouponRepository::new(&txn).try_redeem(coupon_id).await? {
                tracing::warn!(
                    order_id = order.id,
                    coupon_id,
                    "Coupon exhausted before failed order was paid, honoring paid price"
                );
            }
        }

        let plan = PlanRepository::new(&txn)
            .find_by_id(order.plan_id)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Order {} references missing plan {}",
                    order.id, order.plan_id
                ))
            })?;

        match plan.kind {
            PlanKind::TopUp => {
                Ledger::new(&txn)
                    .add_top_up(order.user_id, plan.credits, CreditAction::TopUpPurchase)
                    .await?;
            }
            PlanKind::Subscription => {
                activate_subscription(&txn, order.user_id, &plan, now).await?;
            }
        }

        let completed = order_repo
            .find_by_id(order.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order.id)))?;

        txn.commit().await?;

        tracing::info!(
            user_id = completed.user_id,
            order_id = completed.id,
            plan = %plan.slug,
            "Completed order"
        );

        Ok(CompletionOutcome::Completed(completed))
    }
}

/// Starts or renews the user's subscription to `plan`.
///
/// Renewing the active subscription of the same plan pushes its period end to the
/// next monthly anniversary of its start and leaves the monthly bucket alone until
/// the next reset. Any other purchase cancels the current subscription, starts a new
/// one-month period, and sets the monthly bucket to the plan's grant with the reset at
/// the period end.
async fn activate_subscription<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    plan: &Plan,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let subscription_repo = SubscriptionRepository::new(db);
    let user_repo = UserRepository::new(db);

    let current = subscription_repo.find_active_for_user(user_id, now).await?;
    if let Some(current) = current {
        if current.plan_id == plan.id {
            let period_end =
                next_anniversary_after(current.current_period_start, current.current_period_end)?;
            subscription_repo.extend(current.id, period_end).await?;
            tracing::info!(user_id, plan = %plan.slug, "Extended subscription");
            return Ok(());
        }

        subscription_repo
            .set_status(current.id, SubscriptionStatus::Cancelled)
            .await?;
    }

    let period_end = months_after(now, 1)?;
    subscription_repo
        .create(user_id, plan.id, now, period_end)
        .await?;
    user_repo.set_plan(user_id, Some(plan.id)).await?;
    Ledger::new(db)
        .set_monthly(user_id, plan.credits, CreditAction::SubscriptionGrant)
        .await?;
    user_repo
        .set_monthly_reset_at(user_id, Some(period_end))
        .await?;

    tracing::info!(user_id, plan = %plan.slug, "Started subscription");

    Ok(())
}
