use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No user id is stored in the session.
    ///
    /// The request was made without logging in. Results in 401 Unauthorized.
    #[error("No user in session")]
    UserNotInSession,

    /// The session references a user that no longer exists.
    ///
    /// Results in 401 Unauthorized so the client logs in again.
    #[error("User {0} from session not found in database")]
    UserNotInDatabase(i32),

    /// The user lacks a permission required by the endpoint.
    ///
    /// # Fields
    /// - User id
    /// - Description of the denied action, logged server-side
    #[error("User {0} denied access: {1}")]
    AccessDenied(i32, String),

    /// A service-to-service endpoint was called without its shared bearer secret.
    ///
    /// Holds the name of the endpoint's caller, e.g. `cron`.
    #[error("Invalid or missing {0} secret")]
    InvalidServiceSecret(&'static str),
}

/// Converts authentication errors into HTTP responses.
///
/// - `UserNotInSession` / `UserNotInDatabase` → 401 Unauthorized
/// - `InvalidServiceSecret` → 401 Unauthorized
/// - `AccessDenied` → 403 Forbidden
///
/// Details are logged at debug level while client-facing messages stay generic.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::UserNotInSession | Self::UserNotInDatabase(_) => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorDto {
                    error: "You must be logged in".to_string(),
                }),
            )
                .into_response(),
            Self::InvalidServiceSecret(_) => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorDto {
                    error: "Unauthorized".to_string(),
                }),
            )
                .into_response(),
            Self::AccessDenied(_, _) => (
                StatusCode::FORBIDDEN,
                Json(ErrorDto {
                    error: "Insufficient permissions".to_string(),
                }),
            )
                .into_response(),
        }
    }
}
