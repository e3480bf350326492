use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        post::{CreatePostDto, PublishedPostDto},
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::{
            credit::client_idempotency_key,
            post::{PublishPostParam, Visibility},
        },
        service::posting::PostingService,
        state::AppState,
    },
};

/// Tag for grouping post endpoints in OpenAPI documentation
pub static POST_TAG: &str = "post";

/// Publish to LinkedIn now.
///
/// Charges one credit, then publishes as the user's connected LinkedIn member. If
/// LinkedIn rejects the post the credit is refunded and the call fails with
/// `502 Bad Gateway`.
///
/// # Access Control
/// - Signed-in user with a connected LinkedIn account
///
/// # Returns
/// - `201 Created` - Published, body holds the LinkedIn post id and new balance
/// - `400 Bad Request` - Empty or overlong content, unknown visibility, no LinkedIn account
/// - `401 Unauthorized` - User not authenticated
/// - `402 Payment Required` - Insufficient credits or trial expired
/// - `409 Conflict` - Idempotency key was already used
/// - `502 Bad Gateway` - LinkedIn rejected the post
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = POST_TAG,
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post published", body = PublishedPostDto),
        (status = 400, description = "Invalid post", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 402, description = "Insufficient credits or trial expired", body = ErrorDto),
        (status = 409, description = "Post already submitted", body = ErrorDto),
        (status = 502, description = "LinkedIn unavailable", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_post(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreatePostDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let visibility = Visibility::from_request(payload.visibility.as_deref())?;
    let idempotency_key = client_idempotency_key(payload.idempotency_key)?;

    let published = PostingService::new(&state.db, state.publisher.as_ref())
        .post_now(PublishPostParam {
            user_id: user.id,
            content: payload.content,
            visibility,
            idempotency_key,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(published.into_dto())))
}
