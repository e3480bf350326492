//! User factory for creating test user entities.
//!
//! This module provides factory methods for creating user entities with sensible
//! defaults, reducing boilerplate in tests. The factory supports customization
//! through a builder pattern.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test users with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::user::UserFactory;
///
/// let user = UserFactory::new(&db)
///     .email("someone@example.com")
///     .top_up_credits(25)
///     .admin(true)
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    email: String,
    name: String,
    admin: bool,
    top_up_credits: i64,
    monthly_credits: i64,
    monthly_credits_reset_at: Option<DateTime<Utc>>,
    trial_started_at: DateTime<Utc>,
    trial_days: i32,
    plan_id: Option<i32>,
    linkedin_urn: Option<String>,
    linkedin_access_token: Option<String>,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - email: `"user{id}@example.com"` where id is auto-incremented
    /// - name: `"User {id}"`
    /// - admin: `false`
    /// - credits: `0` top-up, `0` monthly
    /// - trial: started now, 7 days long
    /// - no plan and no LinkedIn account
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            email: format!("user{}@example.com", id),
            name: format!("User {}", id),
            admin: false,
            top_up_credits: 0,
            monthly_credits: 0,
            monthly_credits_reset_at: None,
            trial_started_at: Utc::now(),
            trial_days: 7,
            plan_id: None,
            linkedin_urn: None,
            linkedin_access_token: None,
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    pub fn top_up_credits(mut self, credits: i64) -> Self {
        self.top_up_credits = credits;
        self
    }

    pub fn monthly_credits(mut self, credits: i64) -> Self {
        self.monthly_credits = credits;
        self
    }

    pub fn monthly_credits_reset_at(mut self, reset_at: DateTime<Utc>) -> Self {
        self.monthly_credits_reset_at = Some(reset_at);
        self
    }

    /// Sets the trial start so that the trial window has already closed.
    pub fn trial_expired(mut self) -> Self {
        self.trial_started_at = Utc::now() - chrono::Duration::days(self.trial_days as i64 + 1);
        self
    }

    pub fn trial_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.trial_started_at = started_at;
        self
    }

    pub fn plan_id(mut self, plan_id: i32) -> Self {
        self.plan_id = Some(plan_id);
        self
    }

    /// Attaches a connected LinkedIn account with placeholder credentials.
    pub fn with_linkedin(mut self) -> Self {
        let id = next_id();
        self.linkedin_urn = Some(format!("urn:li:person:test{}", id));
        self.linkedin_access_token = Some(format!("token-{}", id));
        self
    }

    /// Builds and inserts the user entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user::Model)` - Created user entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            email: ActiveValue::Set(self.email),
            name: ActiveValue::Set(self.name),
            admin: ActiveValue::Set(self.admin),
            top_up_credits: ActiveValue::Set(self.top_up_credits),
            monthly_credits: ActiveValue::Set(self.monthly_credits),
            monthly_credits_reset_at: ActiveValue::Set(self.monthly_credits_reset_at),
            trial_started_at: ActiveValue::Set(self.trial_started_at),
            trial_days: ActiveValue::Set(self.trial_days),
            plan_id: ActiveValue::Set(self.plan_id),
            linkedin_urn: ActiveValue::Set(self.linkedin_urn),
            linkedin_access_token: ActiveValue::Set(self.linkedin_access_token),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a user with default values.
///
/// Shorthand for `UserFactory::new(db).build().await`.
pub async fn create_user(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).build().await
}

/// Creates a user holding the given number of top-up credits.
pub async fn create_user_with_credits(
    db: &DatabaseConnection,
    top_up_credits: i64,
) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db)
        .top_up_credits(top_up_credits)
        .build()
        .await
}
