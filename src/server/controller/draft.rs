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
        draft::{DraftDto, PaginatedDraftsDto, SaveDraftDto},
    },
    server::{
        error::AppError, middleware::auth::AuthGuard, model::draft::SaveDraftParam,
        service::draft::DraftService, state::AppState,
    },
};

/// Tag for grouping draft endpoints in OpenAPI documentation
pub static DRAFT_TAG: &str = "draft";

#[utoipa::path(
    post,
    path = "/api/drafts",
    tag = DRAFT_TAG,
    request_body = SaveDraftDto,
    responses(
        (status = 201, description = "Draft created", body = DraftDto),
        (status = 400, description = "Empty or overlong draft", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_draft(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SaveDraftDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let draft = DraftService::new(&state.db)
        .create(SaveDraftParam {
            user_id: user.id,
            title: payload.title,
            content: payload.content,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(draft.into_dto())))
}

/// Get the user's drafts, most recently edited first.
#[utoipa::path(
    get,
    path = "/api/drafts",
    tag = DRAFT_TAG,
    params(PaginationParam),
    responses(
        (status = 200, description = "Drafts page", body = PaginatedDraftsDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_drafts(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<PaginationParam>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let drafts = DraftService::new(&state.db)
        .list(user.id, params.page, params.limit())
        .await?;

    Ok((StatusCode::OK, Json(drafts.into_dto())))
}

/// Replace a draft's title and content.
///
/// Drafts owned by other users are reported as not found.
#[utoipa::path(
    put,
    path = "/api/drafts/{id}",
    tag = DRAFT_TAG,
    params(
        ("id" = i32, Path, description = "Draft ID")
    ),
    request_body = SaveDraftDto,
    responses(
        (status = 200, description = "Draft updated", body = DraftDto),
        (status = 400, description = "Empty or overlong draft", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Draft not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_draft(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<SaveDraftDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let draft = DraftService::new(&state.db)
        .update(
            id,
            SaveDraftParam {
                user_id: user.id,
                title: payload.title,
                content: payload.content,
            },
        )
        .await?;

    Ok((StatusCode::OK, Json(draft.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/drafts/{id}",
    tag = DRAFT_TAG,
    params(
        ("id" = i32, Path, description = "Draft ID")
    ),
    responses(
        (status = 204, description = "Draft deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Draft not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_draft(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    DraftService::new(&state.db).delete(user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
