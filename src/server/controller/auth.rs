use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        user::{SignInDto, UserDto},
    },
    server::{
        error::AppError,
        middleware::{auth::require_service_secret, session::AuthSession},
        model::user::LinkedInAccount,
        service::user::UserService,
        state::AppState,
    },
};

/// Tag for grouping auth endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

/// Opens a session for a user verified by the auth backend.
///
/// The auth backend completes the LinkedIn OAuth flow, then calls this endpoint with
/// the shared `AUTH_SECRET` as a bearer token. The user is created with trial credits
/// on first sign-in, and the LinkedIn link is refreshed when one is supplied. The
/// response carries the session cookie, which the auth backend forwards to the browser.
///
/// # Access Control
/// - Bearer `AUTH_SECRET` - Only the auth backend may sign users in
///
/// # Returns
/// - `200 OK` - Session opened, body is the signed-in user
/// - `400 Bad Request` - Invalid email or LinkedIn credentials
/// - `401 Unauthorized` - Missing or wrong bearer secret
/// - `500 Internal Server Error` - Database or session store error
#[utoipa::path(
    post,
    path = "/api/auth/session",
    tag = AUTH_TAG,
    request_body = SignInDto,
    responses(
        (status = 200, description = "Session opened", body = UserDto),
        (status = 400, description = "Invalid sign-in data", body = ErrorDto),
        (status = 401, description = "Missing or wrong bearer secret", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(payload): Json<SignInDto>,
) -> Result<impl IntoResponse, AppError> {
    require_service_secret(&headers, &state.config.auth_secret, "auth")?;

    let user_service = UserService::new(&state.db);
    let mut user = user_service
        .get_or_create(&payload.email, &payload.name, state.config.trial)
        .await?;

    if let Some(account) = payload.linkedin {
        user = user_service
            .link_linkedin(user.id, Some(LinkedInAccount::from_dto(account)))
            .await?;
    }

    AuthSession::new(&session).set_user_id(user.id).await?;

    tracing::info!(user_id = user.id, "User signed in");

    Ok((StatusCode::OK, Json(user.into_dto(chrono::Utc::now()))))
}

/// Ends the current session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 204, description = "Session cleared")
    ),
)]
pub async fn logout(session: Session) -> impl IntoResponse {
    AuthSession::new(&session).clear().await;

    StatusCode::NO_CONTENT
}
