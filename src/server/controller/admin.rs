use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, PaginationParam},
        coupon::{CouponDto, CreateCouponDto, PaginatedCouponsDto},
        credit::CreditTransactionDto,
        plan::{CreatePlanDto, PlanDto},
        user::{GrantCreditsDto, PaginatedUsersDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            coupon::CreateCouponParam,
            plan::CreatePlanParam,
            user::{GetAllUsersParam, SetAdminParam},
        },
        service::{coupon::CouponService, plan::PlanService, user::UserService},
        state::AppState,
    },
};

/// Tag for grouping admin endpoints in OpenAPI documentation
pub static ADMIN_TAG: &str = "admin";

/// Get all users with pagination.
///
/// # Access Control
/// - `Admin` - Only admins can list users
///
/// # Returns
/// - `200 OK` - Paginated users with their balances
/// - `401 Unauthorized` - User not authenticated
/// - `403 Forbidden` - User is not an admin
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = ADMIN_TAG,
    params(PaginationParam),
    responses(
        (status = 200, description = "Paginated users", body = PaginatedUsersDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_all_users(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<PaginationParam>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let users = UserService::new(&state.db)
        .get_all_users(GetAllUsersParam {
            page: params.page,
            per_page: params.limit(),
        })
        .await?;

    Ok((StatusCode::OK, Json(users.into_dto(Utc::now()))))
}

/// Grant admin privileges to a user.
///
/// # Access Control
/// - `Admin` - Only admins can grant admin
///
/// # Returns
/// - `204 No Content` - User is now an admin
/// - `404 Not Found` - User does not exist
#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}/admin",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Admin granted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_admin(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    UserService::new(&state.db)
        .set_admin(SetAdminParam {
            user_id,
            is_admin: true,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Revoke admin privileges from a user.
///
/// Admins cannot revoke their own privileges, so the last admin cannot lock
/// everyone out.
///
/// # Access Control
/// - `Admin` - Only admins can revoke admin
///
/// # Returns
/// - `204 No Content` - Admin revoked
/// - `400 Bad Request` - Admin tried to revoke their own privileges
/// - `404 Not Found` - User does not exist
#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_id}/admin",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Admin revoked"),
        (status = 400, description = "Cannot revoke own admin", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_admin(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    if admin.id == user_id {
        return Err(AppError::BadRequest(
            "Cannot revoke your own admin privileges".to_string(),
        ));
    }

    UserService::new(&state.db)
        .set_admin(SetAdminParam {
            user_id,
            is_admin: false,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Add top-up credits to a user's balance.
///
/// Recorded in the user's ledger as an admin grant.
#[utoipa::path(
    post,
    path = "/api/admin/users/{user_id}/credits",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    request_body = GrantCreditsDto,
    responses(
        (status = 201, description = "Credits granted", body = CreditTransactionDto),
        (status = 400, description = "Amount is not positive", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn grant_credits(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Json(payload): Json<GrantCreditsDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let transaction = UserService::new(&state.db)
        .grant_credits(user_id, payload.amount)
        .await?;

    tracing::info!(admin_id = admin.id, user_id, amount = payload.amount, "Admin granted credits");

    Ok((StatusCode::CREATED, Json(transaction.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/admin/coupons",
    tag = ADMIN_TAG,
    params(PaginationParam),
    responses(
        (status = 200, description = "Paginated coupons", body = PaginatedCouponsDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_coupons(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<PaginationParam>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let coupons = CouponService::new(&state.db)
        .list(params.page, params.limit())
        .await?;

    Ok((StatusCode::OK, Json(coupons.into_dto())))
}

/// Create a coupon.
///
/// Codes are stored upper case and must be unique.
///
/// # Access Control
/// - `Admin` - Only admins can create coupons
///
/// # Returns
/// - `201 Created` - Coupon created
/// - `400 Bad Request` - Invalid code, discount or plan
/// - `409 Conflict` - Code already in use
#[utoipa::path(
    post,
    path = "/api/admin/coupons",
    tag = ADMIN_TAG,
    request_body = CreateCouponDto,
    responses(
        (status = 201, description = "Coupon created", body = CouponDto),
        (status = 400, description = "Invalid coupon data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 409, description = "Coupon code already exists", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_coupon(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateCouponDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let param = CreateCouponParam::from_dto(payload)?;
    let coupon = CouponService::new(&state.db).create(param).await?;

    Ok((StatusCode::CREATED, Json(coupon.into_dto())))
}

/// Deactivate a coupon so it can no longer be applied.
#[utoipa::path(
    delete,
    path = "/api/admin/coupons/{coupon_id}",
    tag = ADMIN_TAG,
    params(
        ("coupon_id" = i32, Path, description = "Coupon ID")
    ),
    responses(
        (status = 204, description = "Coupon deactivated"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "Coupon not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn deactivate_coupon(
    State(state): State<AppState>,
    session: Session,
    Path(coupon_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    CouponService::new(&state.db).deactivate(coupon_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get every plan, including retired ones.
#[utoipa::path(
    get,
    path = "/api/admin/plans",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "All plans", body = Vec<PlanDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_all_plans(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let plans: Vec<PlanDto> = PlanService::new(&state.db)
        .list_all()
        .await?
        .into_iter()
        .map(|p| p.into_dto())
        .collect();

    Ok((StatusCode::OK, Json(plans)))
}

/// Create a plan.
///
/// # Access Control
/// - `Admin` - Only admins can create plans
///
/// # Returns
/// - `201 Created` - Plan created and on sale
/// - `400 Bad Request` - Invalid kind, price, currency or credits
/// - `409 Conflict` - Slug already in use
#[utoipa::path(
    post,
    path = "/api/admin/plans",
    tag = ADMIN_TAG,
    request_body = CreatePlanDto,
    responses(
        (status = 201, description = "Plan created", body = PlanDto),
        (status = 400, description = "Invalid plan data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 409, description = "Plan slug already exists", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_plan(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreatePlanDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let param = CreatePlanParam::from_dto(payload)?;
    let plan = PlanService::new(&state.db).create(param).await?;

    Ok((StatusCode::CREATED, Json(plan.into_dto())))
}

/// Put a retired plan back on sale.
#[utoipa::path(
    put,
    path = "/api/admin/plans/{plan_id}/active",
    tag = ADMIN_TAG,
    params(
        ("plan_id" = i32, Path, description = "Plan ID")
    ),
    responses(
        (status = 204, description = "Plan activated"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "Plan not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn activate_plan(
    State(state): State<AppState>,
    session: Session,
    Path(plan_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    PlanService::new(&state.db).set_active(plan_id, true).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Take a plan off sale. Existing subscriptions keep renewing their credits.
#[utoipa::path(
    delete,
    path = "/api/admin/plans/{plan_id}/active",
    tag = ADMIN_TAG,
    params(
        ("plan_id" = i32, Path, description = "Plan ID")
    ),
    responses(
        (status = 204, description = "Plan retired"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "Plan not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn retire_plan(
    State(state): State<AppState>,
    session: Session,
    Path(plan_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    PlanService::new(&state.db).set_active(plan_id, false).await?;

    Ok(StatusCode::NO_CONTENT)
}
