use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

/// Rejections raised by the credit ledger.
#[derive(Error, Debug, PartialEq)]
pub enum CreditError {
    /// The combined balance cannot cover the action.
    ///
    /// Results in 402 Payment Required.
    #[error("Insufficient credits: {required} required, {available} available")]
    InsufficientCredits { required: i64, available: i64 },

    /// The trial ended and the user has neither a subscription nor top-up credits.
    ///
    /// Results in 402 Payment Required.
    #[error("Your free trial has ended, purchase a plan or credits to continue")]
    TrialExpired,

    /// The deduction was already reversed once.
    ///
    /// Results in 409 Conflict.
    #[error("Credit transaction {0} has already been refunded")]
    AlreadyRefunded(i32),

    /// The transaction is not a deduction and cannot be refunded.
    ///
    /// Results in 400 Bad Request.
    #[error("Credit transaction {0} is not a refundable deduction")]
    NotRefundable(i32),

    /// The balance kept changing underneath every compare-and-swap attempt.
    ///
    /// Results in 409 Conflict; the client may retry.
    #[error("Credit balance for user {0} is being modified concurrently")]
    Contention(i32),
}

impl IntoResponse for CreditError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::InsufficientCredits { .. } | Self::TrialExpired => StatusCode::PAYMENT_REQUIRED,
            Self::AlreadyRefunded(_) | Self::Contention(_) => StatusCode::CONFLICT,
            Self::NotRefundable(_) => StatusCode::BAD_REQUEST,
        };

        (
            status,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
