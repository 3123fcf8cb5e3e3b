//! API Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use smeraldo_mining::MiningError;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input or policy, carrying a machine-readable reason code
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<MiningError> for ApiError {
    fn from(e: MiningError) -> Self {
        match e {
            MiningError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            MiningError::Policy(violation) => ApiError::BadRequest {
                code: violation.reason_code(),
                message: violation.to_string(),
            },
            MiningError::Wallet(wallet) => ApiError::BadRequest {
                code: wallet.reason_code(),
                message: wallet.to_string(),
            },
            MiningError::MissingField(field) => ApiError::BadRequest {
                code: "MISSING_FIELD",
                message: format!("{} is required", field),
            },
            MiningError::Conflict(msg) => ApiError::Conflict(msg),
            MiningError::Forbidden(_) => ApiError::Forbidden("Not authorized".to_string()),
            MiningError::Storage(inner) => {
                error!(error = %inner, "storage_failure");
                ApiError::Internal("Storage failure".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = Json(json!({
            "error": error_type,
            "message": message,
        }));

        (status, body).into_response()
    }
}
