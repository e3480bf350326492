//! Subscription factory.

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates an active subscription whose period started a day ago and ends in 29 days.
pub async fn create_subscription(
    db: &DatabaseConnection,
    user_id: i32,
    plan_id: i32,
) -> Result<entity::subscription::Model, DbErr> {
    let now = Utc::now();
    entity::subscription::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        plan_id: ActiveValue::Set(plan_id),
        status: ActiveValue::Set("active".to_string()),
        current_period_start: ActiveValue::Set(now - Duration::days(1)),
        current_period_end: ActiveValue::Set(now + Duration::days(29)),
        created_at: ActiveValue::Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}
