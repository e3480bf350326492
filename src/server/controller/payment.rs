use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        payment::{
            CheckoutDto, CheckoutResponseDto, OrderDto, PaymentDto, VerifyPaymentDto,
            WebhookAckDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::order::{CheckoutParam, CompletionOutcome, VerifyPaymentParam},
        service::payment::PaymentService,
        state::AppState,
    },
};

/// Tag for grouping payment endpoints in OpenAPI documentation
pub static PAYMENT_TAG: &str = "payment";

/// Header carrying the gateway's HMAC over the raw webhook body.
static WEBHOOK_SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// Start a purchase of a plan.
///
/// Prices the plan, applies the optional coupon and opens an order with the payment
/// gateway. The response holds everything the client-side payment widget needs. An
/// order discounted to zero is completed immediately and comes back `completed`.
///
/// # Access Control
/// - Signed-in user
///
/// # Returns
/// - `201 Created` - Order opened
/// - `400 Bad Request` - Coupon cannot be used for this plan or is used up
/// - `401 Unauthorized` - User not authenticated
/// - `404 Not Found` - Unknown plan or coupon
/// - `502 Bad Gateway` - Payment gateway unavailable
#[utoipa::path(
    post,
    path = "/api/payments/checkout",
    tag = PAYMENT_TAG,
    request_body = CheckoutDto,
    responses(
        (status = 201, description = "Order opened", body = CheckoutResponseDto),
        (status = 400, description = "Coupon cannot be used for this plan or is used up", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Unknown plan or coupon", body = ErrorDto),
        (status = 502, description = "Payment gateway unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CheckoutDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let service = PaymentService::new(&state.db, state.gateway.as_ref(), &state.config.razorpay);
    let result = service
        .checkout(CheckoutParam {
            user_id: user.id,
            plan_slug: payload.plan_slug,
            coupon_code: payload.coupon_code.filter(|code| !code.trim().is_empty()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(result.into_dto())))
}

/// Confirm a payment reported by the payment widget.
///
/// Checks the widget's signature and completes the order. Credits or the
/// subscription are granted once, however many times the order is confirmed.
///
/// # Access Control
/// - Signed-in user who owns the order
///
/// # Returns
/// - `200 OK` - Order completed, now or earlier
/// - `401 Unauthorized` - User not authenticated or signature invalid
/// - `404 Not Found` - Order unknown or owned by another user
#[utoipa::path(
    post,
    path = "/api/payments/verify",
    tag = PAYMENT_TAG,
    request_body = VerifyPaymentDto,
    responses(
        (status = 200, description = "Order completed", body = OrderDto),
        (status = 401, description = "User not authenticated or invalid signature", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<VerifyPaymentDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let service = PaymentService::new(&state.db, state.gateway.as_ref(), &state.config.razorpay);
    let outcome = service
        .verify(VerifyPaymentParam {
            user_id: user.id,
            gateway_order_id: payload.gateway_order_id,
            gateway_payment_id: payload.gateway_payment_id,
            signature: payload.signature,
        })
        .await?;

    if let CompletionOutcome::AlreadyCompleted(order) = &outcome {
        tracing::debug!(order_id = order.id, "Payment verified for completed order");
    }

    Ok((StatusCode::OK, Json(outcome.order().into_dto())))
}

/// Gateway webhook receiver.
///
/// Authenticated by the `X-Razorpay-Signature` header instead of a session. The body
/// is read raw so the signature is checked over the exact bytes the gateway signed.
#[utoipa::path(
    post,
    path = "/api/payments/webhook",
    tag = PAYMENT_TAG,
    params(
        ("X-Razorpay-Signature" = String, Header, description = "HMAC-SHA256 of the body with the webhook secret")
    ),
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "Delivery acknowledged", body = WebhookAckDto),
        (status = 400, description = "Malformed event", body = ErrorDto),
        (status = 401, description = "Missing or invalid signature", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let service = PaymentService::new(&state.db, state.gateway.as_ref(), &state.config.razorpay);
    let outcome = service.webhook(&body, signature).await?;

    Ok((StatusCode::OK, Json(outcome.into_dto())))
}

/// The signed-in user's completed payments, newest first.
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = PAYMENT_TAG,
    responses(
        (status = 200, description = "Payment history", body = Vec<PaymentDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_payments(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let service = PaymentService::new(&state.db, state.gateway.as_ref(), &state.config.razorpay);
    let payments: Vec<PaymentDto> = service
        .list_payments(user.id)
        .await?
        .into_iter()
        .map(|p| p.into_dto())
        .collect();

    Ok((StatusCode::OK, Json(payments)))
}
