use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use stockdesk_core::errors::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    /// Rejected query or path parameter
    #[error("{0}")]
    Validation(String),
    #[error("Not Found")]
    NotFound,
}

/// Body of every error response.
#[derive(Serialize)]
pub(crate) struct ErrorEnvelope {
    success: bool,
    message: String,
    error_code: &'static str,
    timestamp: String,
}

pub(crate) fn error_response(status: StatusCode, error_code: &'static str, message: String) -> Response {
    let body = Json(ErrorEnvelope {
        success: false,
        message,
        error_code,
        timestamp: chrono::Utc::now().to_rfc3339(),
    });
    (status, body).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Core(e) => {
                let status = StatusCode::from_u16(e.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!("Request failed: {}", e);
                    (status, e.error_code(), "Internal server error".to_string())
                } else {
                    (status, e.error_code(), e.to_string())
                }
            }
            ApiError::Validation(reason) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", reason.clone())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
        };
        error_response(status, code, message)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
