//! HTTP routes and the generated OpenAPI document.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{
        admin, auth, coupon, credit, cron, draft, health, payment, plan, post, scheduled_post,
        user,
    },
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "LinkzUp API", description = "Credits, billing and LinkedIn publishing"),
    tags(
        (name = "auth", description = "Sessions opened by the auth backend"),
        (name = "user", description = "Signed-in user profile"),
        (name = "credit", description = "Credit balance, deductions and usage"),
        (name = "plan", description = "Plans on sale"),
        (name = "coupon", description = "Coupon previews"),
        (name = "payment", description = "Checkout, verification and gateway webhooks"),
        (name = "post", description = "Immediate LinkedIn posts"),
        (name = "scheduled-post", description = "Posts queued for later"),
        (name = "draft", description = "Unpublished drafts"),
        (name = "admin", description = "User, coupon and plan administration"),
        (name = "cron", description = "External timer triggers"),
        (name = "health", description = "Liveness")
    )
)]
struct ApiDoc;

/// Builds every API route plus Swagger UI at `/api/docs`.
pub fn router() -> Router<AppState> {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(auth::sign_in))
        .routes(routes!(auth::logout))
        .routes(routes!(user::get_me))
        .routes(routes!(credit::get_balance))
        .routes(routes!(credit::deduct_credits))
        .routes(routes!(credit::get_history))
        .routes(routes!(credit::get_usage))
        .routes(routes!(plan::get_plans))
        .routes(routes!(coupon::validate_coupon))
        .routes(routes!(payment::checkout))
        .routes(routes!(payment::verify_payment))
        .routes(routes!(payment::webhook))
        .routes(routes!(payment::get_payments))
        .routes(routes!(post::create_post))
        .routes(routes!(
            scheduled_post::get_scheduled_posts,
            scheduled_post::create_scheduled_post
        ))
        .routes(routes!(scheduled_post::cancel_scheduled_post))
        .routes(routes!(cron::process_scheduled_posts))
        .routes(routes!(draft::get_drafts, draft::create_draft))
        .routes(routes!(draft::update_draft, draft::delete_draft))
        .routes(routes!(admin::get_all_users))
        .routes(routes!(admin::add_admin, admin::remove_admin))
        .routes(routes!(admin::grant_credits))
        .routes(routes!(admin::get_coupons, admin::create_coupon))
        .routes(routes!(admin::deactivate_coupon))
        .routes(routes!(admin::get_all_plans, admin::create_plan))
        .routes(routes!(admin::activate_plan, admin::retire_plan))
        .routes(routes!(health::health))
        .split_for_parts();

    router.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
