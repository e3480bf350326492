use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, PaginationParam},
        credit::{
            BalanceDto, CreditHistoryDto, CreditTransactionDto, DeductCreditsDto, UsageDto,
            UsageQuery,
        },
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::credit::{client_idempotency_key, CreditAction, DeductCreditsParam},
        service::credit::CreditService,
        state::AppState,
    },
};

/// Tag for grouping credit endpoints in OpenAPI documentation
pub static CREDIT_TAG: &str = "credit";

/// Get the signed-in user's credit balance.
///
/// Returns both buckets, the trial window and whether a subscription is active.
/// A due monthly refresh is applied before the balance is read.
///
/// # Access Control
/// - Signed-in user
///
/// # Returns
/// - `200 OK` - Current balance
/// - `401 Unauthorized` - User not authenticated
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/credits",
    tag = CREDIT_TAG,
    responses(
        (status = 200, description = "Current balance", body = BalanceDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_balance(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let balance = CreditService::new(&state.db).balance(user.id).await?;

    Ok((StatusCode::OK, Json(balance.into_dto(chrono::Utc::now()))))
}

/// Deduct credits for a chargeable action.
///
/// Monthly credits are spent before top-up credits. Repeating a request with the
/// same `idempotency_key` returns the original ledger row with `200 OK` instead of
/// charging again.
///
/// # Access Control
/// - Signed-in user
///
/// # Returns
/// - `201 Created` - Credits deducted
/// - `200 OK` - Idempotency key matched an earlier deduction
/// - `400 Bad Request` - Unknown or non-chargeable action, or reserved idempotency key
/// - `401 Unauthorized` - User not authenticated
/// - `402 Payment Required` - Insufficient credits or trial expired
/// - `409 Conflict` - Balance kept changing or the key is in use
#[utoipa::path(
    post,
    path = "/api/credits/deduct",
    tag = CREDIT_TAG,
    request_body = DeductCreditsDto,
    responses(
        (status = 201, description = "Credits deducted", body = CreditTransactionDto),
        (status = 200, description = "Earlier deduction with the same key", body = CreditTransactionDto),
        (status = 400, description = "Unknown or non-chargeable action", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 402, description = "Insufficient credits or trial expired", body = ErrorDto),
        (status = 409, description = "Concurrent update, retry", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn deduct_credits(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<DeductCreditsDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let action = CreditAction::parse(&payload.action)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown action '{}'", payload.action)))?;
    let idempotency_key = client_idempotency_key(payload.idempotency_key)?;

    let deduction = CreditService::new(&state.db)
        .deduct(DeductCreditsParam {
            user_id: user.id,
            action,
            idempotency_key,
        })
        .await?;

    let status = if deduction.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((status, Json(deduction.transaction.into_dto())))
}

/// Get a page of the user's credit ledger, newest first.
#[utoipa::path(
    get,
    path = "/api/credits/history",
    tag = CREDIT_TAG,
    params(PaginationParam),
    responses(
        (status = 200, description = "Ledger page", body = CreditHistoryDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_history(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<PaginationParam>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let history = CreditService::new(&state.db)
        .history(user.id, params.page, params.limit())
        .await?;

    Ok((StatusCode::OK, Json(history.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/credits/usage",
    tag = CREDIT_TAG,
    params(UsageQuery),
    responses(
        (status = 200, description = "Usage counters for the month", body = UsageDto),
        (status = 400, description = "Malformed month", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_usage(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<UsageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let usage = CreditService::new(&state.db)
        .usage(user.id, query.month)
        .await?;

    Ok((StatusCode::OK, Json(usage.into_dto())))
}
