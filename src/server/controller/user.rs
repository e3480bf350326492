use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{api::ErrorDto, user::UserDto},
    server::{
        error::AppError, middleware::auth::AuthGuard, service::user::UserService,
        state::AppState,
    },
};

/// Tag for grouping user endpoints in OpenAPI documentation
pub static USER_TAG: &str = "user";

/// GET /api/user/me - Profile of the signed-in user
///
/// Returns the user's profile with both credit buckets, trial status and whether a
/// LinkedIn account is connected. A due monthly refresh is applied first.
///
/// # Authentication
/// Requires user to be logged in (no admin permission required)
///
/// # Returns
/// - `200 OK`: UserDto of the signed-in user
/// - `401 Unauthorized`: Not signed in
/// - `500 Internal Server Error`: Database error
#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Signed-in user", body = UserDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_me(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let user = UserService::new(&state.db).me(user.id).await?;

    Ok((StatusCode::OK, Json(user.into_dto(chrono::Utc::now()))))
}
