use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Client-facing error kinds. Every failure a handler can produce ends up as
/// one of these; the message is what the caller sees.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("Already checked in today")]
    AlreadyCheckedIn,

    #[error("No active check-in found or already checked out")]
    NoOpenCheckIn,

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => AppError::StoreUnavailable(e),
            // Callers that expect a duplicate map it themselves; reaching here
            // means a constraint fired where none should have.
            StoreError::Duplicate => AppError::Internal("unexpected duplicate key".to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. }
            | AppError::DuplicateEmail
            | AppError::AlreadyCheckedIn
            | AppError::NoOpenCheckIn => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::StoreUnavailable(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation { field, message } => json!({
                "error": "Validation failed",
                "details": { "field": field, "message": message }
            }),
            AppError::StoreUnavailable(e) => {
                tracing::error!(error = %e, "Store call failed");
                json!({ "error": "Something went wrong, please try again later" })
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal failure");
                json!({ "error": "Something went wrong, please try again later" })
            }
            other => json!({ "error": other.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
