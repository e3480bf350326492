//! Plan service for the plan catalogue.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::{is_unique_violation, plan::PlanRepository},
    error::AppError,
    model::plan::{CreatePlanParam, Plan},
};

pub struct PlanService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PlanService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Plans currently offered for purchase, cheapest first.
    pub async fn list_active(&self) -> Result<Vec<Plan>, AppError> {
        PlanRepository::new(self.db).get_active().await
    }

    /// Looks up a purchasable plan by slug.
    ///
    /// # Returns
    /// - `Ok(Plan)` - The active plan
    /// - `Err(AppError::NotFound)` - No plan with that slug, or the plan is inactive
    pub async fn get_by_slug(&self, slug: &str) -> Result<Plan, AppError> {
        PlanRepository::new(self.db)
            .find_by_slug(slug.trim())
            .await?
            .filter(|plan| plan.active)
            .ok_or_else(|| AppError::NotFound(format!("Plan {} not found", slug)))
    }

    /// All plans including inactive ones, for administration.
    pub async fn list_all(&self) -> Result<Vec<Plan>, AppError> {
        PlanRepository::new(self.db).get_all().await
    }

    /// Creates a plan.
    ///
    /// # Returns
    /// - `Ok(Plan)` - The created plan, active
    /// - `Err(AppError::BadRequest)` - Invalid field values
    /// - `Err(AppError::Conflict)` - Slug already in use
    pub async fn create(&self, param: CreatePlanParam) -> Result<Plan, AppError> {
        param.validate()?;
        let slug = param.slug.clone();

        match PlanRepository::new(self.db).create(param).await {
            Ok(plan) => {
                tracing::info!(plan = %plan.slug, "Created plan");
                Ok(plan)
            }
            Err(AppError::DbErr(ref e)) if is_unique_violation(e) => Err(AppError::Conflict(
                format!("A plan with slug {} already exists", slug),
            )),
            Err(e) => Err(e),
        }
    }

    /// Activates or retires a plan; existing subscriptions are unaffected.
    pub async fn set_active(&self, id: i32, active: bool) -> Result<(), AppError> {
        if !PlanRepository::new(self.db).set_active(id, active).await? {
            return Err(AppError::NotFound(format!("Plan {} not found", id)));
        }
        Ok(())
    }
}
