use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::{api::ErrorDto, plan::PlanDto},
    server::{error::AppError, service::plan::PlanService, state::AppState},
};

/// Tag for grouping plan endpoints in OpenAPI documentation
pub static PLAN_TAG: &str = "plan";

/// List the plans currently on sale.
///
/// Public endpoint used by the pricing page, no session required.
#[utoipa::path(
    get,
    path = "/api/plans",
    tag = PLAN_TAG,
    responses(
        (status = 200, description = "Active plans", body = Vec<PlanDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_plans(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let plans = PlanService::new(&state.db).list_active().await?;

    let plans: Vec<PlanDto> = plans.into_iter().map(|p| p.into_dto()).collect();

    Ok((StatusCode::OK, Json(plans)))
}
