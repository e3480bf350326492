//! Shared helper utilities for factory methods.
//!
//! This module provides common utilities used across all factory modules,
//! including ID generation and convenience methods for creating entities
//! with their dependencies.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique values in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// Provides monotonically increasing values for generating unique emails,
/// slugs, coupon codes and gateway ids across all factories.
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a user with an active subscription to a freshly created plan.
///
/// This is a convenience method that creates:
/// 1. Subscription plan granting `monthly_credits` per month
/// 2. User on that plan holding `monthly_credits` monthly credits
/// 3. Active subscription covering the current month
///
/// # Returns
/// - `Ok((plan, user, subscription))` - Tuple of all created entities
/// - `Err(DbErr)` - Database error during creation
pub async fn create_subscriber(
    db: &DatabaseConnection,
    monthly_credits: i64,
) -> Result<
    (
        entity::plan::Model,
        entity::user::Model,
        entity::subscription::Model,
    ),
    DbErr,
> {
    let plan = crate::factory::plan::PlanFactory::new(db)
        .subscription()
        .credits(monthly_credits)
        .build()
        .await?;
    let user = crate::factory::user::UserFactory::new(db)
        .plan_id(plan.id)
        .monthly_credits(monthly_credits)
        .monthly_credits_reset_at(chrono::Utc::now() + chrono::Duration::days(30))
        .build()
        .await?;
    let subscription =
        crate::factory::subscription::create_subscription(db, user.id, plan.id).await?;

    Ok((plan, user, subscription))
}
