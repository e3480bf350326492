//! Monthly bucket lifecycle: grants on each billing cycle and expiry without a subscription.

use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;

use crate::server::{
    data::{plan::PlanRepository, subscription::SubscriptionRepository, user::UserRepository},
    error::AppError,
    model::{credit::CreditAction, plan::PlanKind, user::User},
    service::credit::ledger::Ledger,
    util::time::next_anniversary_after,
};

pub struct MonthlyCredits<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MonthlyCredits<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Refreshes the user's monthly bucket if its reset date has passed.
    ///
    /// With an active subscription the bucket is set to the plan's grant and the reset
    /// moves to the first monthly anniversary of the subscription start after `now`.
    /// Without one the bucket is zeroed, the reset date cleared and the plan detached.
    /// The reset date is claimed first so concurrent refreshes grant at most once.
    ///
    /// # Returns
    /// - `Ok(User)` - The user as stored after any refresh
    /// - `Err(AppError)` - Database or ledger error
    pub async fn refresh(&self, user: User, now: DateTime<Utc>) -> Result<User, AppError> {
        let Some(reset_at) = user.monthly_credits_reset_at else {
            return Ok(user);
        };
        if reset_at > now {
            return Ok(user);
        }

        let user_repo = UserRepository::new(self.db);
        let ledger = Ledger::new(self.db);

        let subscription = SubscriptionRepository::new(self.db)
            .find_active_for_user(user.id, now)
            .await?;
        let renewal = match subscription {
            Some(subscription) => PlanRepository::new(self.db)
                .find_by_id(subscription.plan_id)
                .await?
                .filter(|plan| plan.kind == PlanKind::Subscription)
                .map(|plan| (plan, subscription.current_period_start)),
            None => None,
        };

        match renewal {
            Some((plan, anchor)) => {
                let next = next_anniversary_after(anchor, now)?;
                if user_repo
                    .advance_monthly_reset(user.id, reset_at, Some(next))
                    .await?
                {
                    ledger
                        .set_monthly(user.id, plan.credits, CreditAction::SubscriptionGrant)
                        .await?;
                    tracing::info!(
                        user_id = user.id,
                        plan = %plan.slug,
                        credits = plan.credits,
                        "Granted monthly credits"
                    );
                }
            }
            None => {
                if user_repo.advance_monthly_reset(user.id, reset_at, None).await? {
                    if user.balance.monthly != 0 {
                        ledger
                            .set_monthly(user.id, 0, CreditAction::MonthlyExpiry)
                            .await?;
                    }
                    user_repo.set_plan(user.id, None).await?;
                    tracing::info!(user_id = user.id, "Monthly credits expired");
                }
            }
        }

        user_repo
            .find_by_id(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.id)))
    }
}
