use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum PaymentError {
    /// The checkout signature returned by the client does not match.
    ///
    /// Results in 401 Unauthorized.
    #[error("Invalid payment signature for gateway order {0}")]
    InvalidSignature(String),

    /// The webhook body signature header is missing or does not match.
    ///
    /// Results in 401 Unauthorized.
    #[error("Invalid webhook signature")]
    InvalidWebhookSignature,

    /// The webhook body could not be parsed.
    ///
    /// Results in 400 Bad Request.
    #[error("Malformed webhook payload: {0}")]
    MalformedWebhook(String),
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        tracing::warn!("{}", self);

        match self {
            Self::InvalidSignature(_) | Self::InvalidWebhookSignature => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorDto {
                    error: "Invalid signature".to_string(),
                }),
            )
                .into_response(),
            Self::MalformedWebhook(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorDto {
                    error: "Malformed webhook payload".to_string(),
                }),
            )
                .into_response(),
        }
    }
}
