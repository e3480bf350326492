use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        coupon::{CouponQuoteDto, ValidateCouponDto},
    },
    server::{
        error::AppError, middleware::auth::AuthGuard, service::coupon::CouponService,
        state::AppState,
    },
};

/// Tag for grouping coupon endpoints in OpenAPI documentation
pub static COUPON_TAG: &str = "coupon";

/// Preview a coupon against a plan.
///
/// Checks the code without redeeming it and returns the discounted price. The code
/// is matched case-insensitively.
///
/// # Access Control
/// - Signed-in user
///
/// # Returns
/// - `200 OK` - Coupon applies, body holds the quote
/// - `400 Bad Request` - Coupon expired, exhausted or not valid for the plan
/// - `401 Unauthorized` - User not authenticated
/// - `404 Not Found` - Unknown coupon or plan
#[utoipa::path(
    post,
    path = "/api/coupons/validate",
    tag = COUPON_TAG,
    request_body = ValidateCouponDto,
    responses(
        (status = 200, description = "Coupon applies", body = CouponQuoteDto),
        (status = 400, description = "Coupon cannot be used for this plan", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Unknown coupon or plan", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn validate_coupon(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ValidateCouponDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let quote = CouponService::new(&state.db)
        .validate(&payload.code, &payload.plan_slug)
        .await?;

    Ok((StatusCode::OK, Json(quote.into_dto())))
}
