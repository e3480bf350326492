use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct PlanDto {
    pub id: i32,
    pub slug: String,
    pub name: String,
    /// `subscription` or `top_up`.
    pub kind: String,
    pub price_cents: i64,
    pub currency: String,
    pub credits: i64,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CreatePlanDto {
    pub slug: String,
    pub name: String,
    pub kind: String,
    pub price_cents: i64,
    pub currency: String,
    pub credits: i64,
}
