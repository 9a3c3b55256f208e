use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ErrorCode {
    // Authentication errors (1xxx)
    #[serde(rename = "AUTH_1001")]
    InvalidSignature,
    #[serde(rename = "AUTH_1002")]
    MissingSignature,
}

impl ErrorCode {
    /// Get numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::InvalidSignature => 1001,
            ErrorCode::MissingSignature => 1002,
        }
    }

    /// Get user-friendly message
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidSignature => "Invalid signature",
            ErrorCode::MissingSignature => "Missing signature header",
        }
    }
}

/// Structured error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub request_id: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub code_number: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Missing {0} header")]
    MissingSignature(&'static str),
}

impl ApiError {
    /// Get error code
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ApiError::InvalidSignature => ErrorCode::InvalidSignature,
            ApiError::MissingSignature(_) => ErrorCode::MissingSignature,
        }
    }

    /// Get error details
    fn error_details(&self) -> Option<String> {
        match self {
            ApiError::MissingSignature(header) => Some(format!("Expected `{}` header", header)),
            _ => None,
        }
    }

    /// Get status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidSignature | ApiError::MissingSignature(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Authentication failures are logged as warnings
    fn log_error(&self, request_id: &str) {
        warn!(
            request_id = %request_id,
            status = %self.status_code(),
            error = %self,
            "Webhook rejected"
        );
    }
}

impl ApiError {
    /// Render the structured error body under the caller's request id.
    pub fn into_response_with_id(self, request_id: &str) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        self.log_error(request_id);

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code,
                code_number: code.code(),
                message: code.message().to_string(),
                details: self.error_details(),
            },
            request_id: request_id.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with_id(&Uuid::new_v4().to_string())
    }
}
