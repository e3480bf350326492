//! Purchasable plans: monthly subscriptions and one-off credit packs.

use chrono::{DateTime, Utc};

use crate::{
    model::plan::{CreatePlanDto, PlanDto},
    server::{error::AppError, util::parse::parse_stored},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    /// Grants `credits` to the monthly bucket every billing cycle.
    Subscription,
    /// Adds `credits` to the top-up bucket once.
    TopUp,
}

impl PlanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::TopUp => "top_up",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "subscription" => Some(Self::Subscription),
            "top_up" => Some(Self::TopUp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub kind: PlanKind,
    pub price_cents: i64,
    pub currency: String,
    pub credits: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    pub fn into_dto(self) -> PlanDto {
        PlanDto {
            id: self.id,
            slug: self.slug,
            name: self.name,
            kind: self.kind.as_str().to_string(),
            price_cents: self.price_cents,
            currency: self.currency,
            credits: self.credits,
            active: self.active,
        }
    }

    pub fn from_entity(entity: entity::plan::Model) -> Result<Self, AppError> {
        let kind = parse_stored("plan.kind", &entity.kind, PlanKind::parse)?;

        Ok(Self {
            id: entity.id,
            slug: entity.slug,
            name: entity.name,
            kind,
            price_cents: entity.price_cents,
            currency: entity.currency,
            credits: entity.credits,
            active: entity.active,
            created_at: entity.created_at,
        })
    }
}

/// Parameters for creating a plan from the admin API.
#[derive(Debug, Clone)]
pub struct CreatePlanParam {
    pub slug: String,
    pub name: String,
    pub kind: PlanKind,
    pub price_cents: i64,
    pub currency: String,
    pub credits: i64,
}

impl CreatePlanParam {
    pub fn from_dto(dto: CreatePlanDto) -> Result<Self, AppError> {
        let kind = PlanKind::parse(&dto.kind).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown plan kind '{}', expected subscription or top_up",
                dto.kind
            ))
        })?;

        Ok(Self {
            slug: dto.slug,
            name: dto.name,
            kind,
            price_cents: dto.price_cents,
            currency: dto.currency,
            credits: dto.credits,
        })
    }

    /// Checks field ranges before the plan is stored.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.slug.trim().is_empty() || self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Plan slug and name are required".to_string()));
        }
        if self.price_cents < 0 {
            return Err(AppError::BadRequest("Plan price cannot be negative".to_string()));
        }
        if self.credits <= 0 {
            return Err(AppError::BadRequest("Plan must grant at least one credit".to_string()));
        }
        if self.currency.len() != 3 {
            return Err(AppError::BadRequest(
                "Currency must be a three-letter ISO code".to_string(),
            ));
        }
        Ok(())
    }
}
