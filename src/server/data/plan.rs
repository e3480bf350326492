use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::{
    error::AppError,
    model::plan::{CreatePlanParam, Plan},
};

pub struct PlanRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PlanRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: CreatePlanParam) -> Result<Plan, AppError> {
        let entity = entity::plan::ActiveModel {
            slug: ActiveValue::Set(param.slug),
            name: ActiveValue::Set(param.name),
            kind: ActiveValue::Set(param.kind.as_str().to_string()),
            price_cents: ActiveValue::Set(param.price_cents),
            currency: ActiveValue::Set(param.currency.to_uppercase()),
            credits: ActiveValue::Set(param.credits),
            active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Plan::from_entity(entity)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Plan>, AppError> {
        entity::prelude::Plan::find_by_id(id)
            .one(self.db)
            .await?
            .map(Plan::from_entity)
            .transpose()
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Plan>, AppError> {
        entity::prelude::Plan::find()
            .filter(entity::plan::Column::Slug.eq(slug))
            .one(self.db)
            .await?
            .map(Plan::from_entity)
            .transpose()
    }

    /// Active plans, cheapest first.
    pub async fn get_active(&self) -> Result<Vec<Plan>, AppError> {
        entity::prelude::Plan::find()
            .filter(entity::plan::Column::Active.eq(true))
            .order_by_asc(entity::plan::Column::PriceCents)
            .order_by_asc(entity::plan::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Plan::from_entity)
            .collect()
    }

    pub async fn get_all(&self) -> Result<Vec<Plan>, AppError> {
        entity::prelude::Plan::find()
            .order_by_asc(entity::plan::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Plan::from_entity)
            .collect()
    }

    /// Returns whether a plan with `id` existed.
    pub async fn set_active(&self, id: i32, active: bool) -> Result<bool, AppError> {
        let result = entity::prelude::Plan::update_many()
            .col_expr(entity::plan::Column::Active, Expr::value(active))
            .filter(entity::plan::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
