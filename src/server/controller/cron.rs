use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::{
    model::{api::ErrorDto, post::ProcessReportDto},
    server::{
        error::AppError, middleware::auth::require_service_secret,
        service::scheduled_post::ScheduledPostService, state::AppState,
    },
};

/// Tag for grouping cron endpoints in OpenAPI documentation
pub static CRON_TAG: &str = "cron";

/// Due posts handled per trigger.
const PROCESS_BATCH_SIZE: u64 = 50;

/// Publish due scheduled posts.
///
/// Trigger for an external timer when the in-process scheduler is disabled. Both
/// paths claim posts before publishing, so overlapping runs never publish a post twice.
///
/// # Access Control
/// - Bearer `CRON_SECRET`
///
/// # Returns
/// - `200 OK` - Counts of posts published, failed and skipped
/// - `401 Unauthorized` - Missing or wrong bearer secret
#[utoipa::path(
    post,
    path = "/api/cron/scheduled-posts",
    tag = CRON_TAG,
    responses(
        (status = 200, description = "Due posts processed", body = ProcessReportDto),
        (status = 401, description = "Missing or wrong bearer secret", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn process_scheduled_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    require_service_secret(&headers, &state.config.cron_secret, "cron")?;

    let report = ScheduledPostService::new(&state.db, state.publisher.as_ref())
        .process_due(Utc::now(), PROCESS_BATCH_SIZE)
        .await?;

    Ok((StatusCode::OK, Json(report.into_dto())))
}
