//! Scheduled post factory.

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating scheduled posts.
///
/// Defaults to a `pending` public post due one minute ago.
pub struct ScheduledPostFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: i32,
    content: String,
    scheduled_for: DateTime<Utc>,
    status: String,
    attempts: i32,
    updated_at: Option<DateTime<Utc>>,
}

impl<'a> ScheduledPostFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, user_id: i32) -> Self {
        Self {
            db,
            user_id,
            content: "Shipping a new feature today.".to_string(),
            scheduled_for: Utc::now() - Duration::minutes(1),
            status: "pending".to_string(),
            attempts: 0,
            updated_at: None,
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn scheduled_for(mut self, scheduled_for: DateTime<Utc>) -> Self {
        self.scheduled_for = scheduled_for;
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn attempts(mut self, attempts: i32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Backdates the last status change, e.g. to simulate an abandoned claim.
    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub async fn build(self) -> Result<entity::scheduled_post::Model, DbErr> {
        let now = Utc::now();
        entity::scheduled_post::ActiveModel {
            user_id: ActiveValue::Set(self.user_id),
            content: ActiveValue::Set(self.content),
            visibility: ActiveValue::Set("PUBLIC".to_string()),
            scheduled_for: ActiveValue::Set(self.scheduled_for),
            status: ActiveValue::Set(self.status),
            attempts: ActiveValue::Set(self.attempts),
            last_error: ActiveValue::Set(None),
            linkedin_post_id: ActiveValue::Set(None),
            credit_transaction_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(self.updated_at.unwrap_or(now)),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a pending post that is already due.
pub async fn create_due_post(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<entity::scheduled_post::Model, DbErr> {
    ScheduledPostFactory::new(db, user_id).build().await
}
