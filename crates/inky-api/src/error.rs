//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned to clients for upstream failures. Details are logged.
const UPSTREAM_MESSAGE: &str = "Upstream service unavailable. Please try again later.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Not implemented: {0}")]
    Unimplemented(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn unimplemented(msg: impl Into<String>) -> Self {
        Self::Unimplemented(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Unimplemented(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "invalid_input",
            ApiError::NotFound(_) => "not_found",
            ApiError::Upstream(_) => "upstream_unavailable",
            ApiError::Unimplemented(_) => "unimplemented",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs can carry API keys in the query string.
        let e = e.without_url();
        if e.is_timeout() {
            ApiError::Upstream(format!("request timed out: {}", e))
        } else {
            ApiError::Upstream(e.to_string())
        }
    }
}

/// Message returned in place of internal error details when masking is on.
pub const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Response extension marking a body that carries internal error details.
#[derive(Debug, Clone, Copy)]
pub struct InternalErrorDetail;

/// Generic 500 body used when internal details must not reach clients.
pub fn masked_internal_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: INTERNAL_MESSAGE.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            ApiError::Upstream(detail) => {
                error!(detail = %detail, "Upstream call failed");
                UPSTREAM_MESSAGE.to_string()
            }
            ApiError::Internal(detail) => {
                error!(detail = %detail, "Internal error");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let mut response = (status, Json(ErrorResponse { error: message })).into_response();
        if matches!(self, ApiError::Internal(_)) {
            response.extensions_mut().insert(InternalErrorDetail);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::upstream("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::unimplemented("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_response_is_marked() {
        let response = ApiError::internal("pool exhausted").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<InternalErrorDetail>().is_some());

        let response = ApiError::not_found("Video not found").into_response();
        assert!(response.extensions().get::<InternalErrorDetail>().is_none());
    }

    #[test]
    fn test_bad_request_message_is_verbatim() {
        assert_eq!(ApiError::bad_request("No video URL provided").to_string(), "No video URL provided");
    }
}
