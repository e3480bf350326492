//! Plan factory for creating test plan entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test plans with customizable fields.
///
/// Defaults to an active top-up pack of 50 credits priced at 49900 INR paise.
pub struct PlanFactory<'a> {
    db: &'a DatabaseConnection,
    slug: String,
    name: String,
    kind: String,
    price_cents: i64,
    currency: String,
    credits: i64,
    active: bool,
}

impl<'a> PlanFactory<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            slug: format!("plan-{}", id),
            name: format!("Plan {}", id),
            kind: "top_up".to_string(),
            price_cents: 49900,
            currency: "INR".to_string(),
            credits: 50,
            active: true,
        }
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    /// Makes the plan a monthly subscription instead of a top-up pack.
    pub fn subscription(mut self) -> Self {
        self.kind = "subscription".to_string();
        self
    }

    pub fn price_cents(mut self, price_cents: i64) -> Self {
        self.price_cents = price_cents;
        self
    }

    pub fn credits(mut self, credits: i64) -> Self {
        self.credits = credits;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub async fn build(self) -> Result<entity::plan::Model, DbErr> {
        entity::plan::ActiveModel {
            slug: ActiveValue::Set(self.slug),
            name: ActiveValue::Set(self.name),
            kind: ActiveValue::Set(self.kind),
            price_cents: ActiveValue::Set(self.price_cents),
            currency: ActiveValue::Set(self.currency),
            credits: ActiveValue::Set(self.credits),
            active: ActiveValue::Set(self.active),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active top-up plan with default values.
pub async fn create_plan(db: &DatabaseConnection) -> Result<entity::plan::Model, DbErr> {
    PlanFactory::new(db).build().await
}
