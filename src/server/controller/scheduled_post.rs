use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, PaginationParam},
        post::{CreateScheduledPostDto, PaginatedScheduledPostsDto, ScheduledPostDto},
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::{post::Visibility, scheduled_post::CreateScheduledPostParam},
        service::scheduled_post::ScheduledPostService,
        state::AppState,
    },
};

/// Tag for grouping scheduled post endpoints in OpenAPI documentation
pub static SCHEDULED_POST_TAG: &str = "scheduled-post";

/// Queue a post for later publication.
///
/// Nothing is charged until the post is published. `scheduled_for` must be in the
/// future and at most 90 days ahead.
///
/// # Access Control
/// - Signed-in user
///
/// # Returns
/// - `201 Created` - Post queued
/// - `400 Bad Request` - Invalid content, visibility or time
/// - `401 Unauthorized` - User not authenticated
#[utoipa::path(
    post,
    path = "/api/scheduled-posts",
    tag = SCHEDULED_POST_TAG,
    request_body = CreateScheduledPostDto,
    responses(
        (status = 201, description = "Post scheduled", body = ScheduledPostDto),
        (status = 400, description = "Invalid scheduled post", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_scheduled_post(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateScheduledPostDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let visibility = Visibility::from_request(payload.visibility.as_deref())?;

    let post = ScheduledPostService::new(&state.db, state.publisher.as_ref())
        .create(CreateScheduledPostParam {
            user_id: user.id,
            content: payload.content,
            visibility,
            scheduled_for: payload.scheduled_for,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(post.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/scheduled-posts",
    tag = SCHEDULED_POST_TAG,
    params(PaginationParam),
    responses(
        (status = 200, description = "Scheduled posts, latest scheduled time first", body = PaginatedScheduledPostsDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_scheduled_posts(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<PaginationParam>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let posts = ScheduledPostService::new(&state.db, state.publisher.as_ref())
        .list(user.id, params.page, params.limit())
        .await?;

    Ok((StatusCode::OK, Json(posts.into_dto())))
}

/// Cancel a pending scheduled post.
///
/// # Returns
/// - `200 OK` - Post cancelled
/// - `400 Bad Request` - Post already published, failed or cancelled
/// - `404 Not Found` - No such post for this user
#[utoipa::path(
    delete,
    path = "/api/scheduled-posts/{id}",
    tag = SCHEDULED_POST_TAG,
    params(
        ("id" = i32, Path, description = "Scheduled post ID")
    ),
    responses(
        (status = 200, description = "Post cancelled", body = ScheduledPostDto),
        (status = 400, description = "Post is no longer pending", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Scheduled post not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel_scheduled_post(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let post = ScheduledPostService::new(&state.db, state.publisher.as_ref())
        .cancel(user.id, id)
        .await?;

    Ok((StatusCode::OK, Json(post.into_dto())))
}
