//! Mapping of use case errors to HTTP responses.

use super::dto::ErrorResponse;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_application::{ChatError, ProviderError, SessionError};
use tracing::{error, warn};

/// An error returned by a handler, rendered as `{"error", "code"}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                code: self.code.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::SessionNotFound(_) => Self::bad_request("INVALID_SESSION", "Invalid session"),
            ChatError::InvalidRequest(e) if e.is_invalid_input() => {
                Self::bad_request("INVALID_REQUEST", e.to_string())
            }
            ChatError::InvalidRequest(e) => {
                error!(error = %e, "Chat turn rejected by the domain");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", e.to_string())
            }
            ChatError::Provider(ProviderError::Timeout(limit)) => {
                warn!(?limit, "Completion timed out");
                Self::new(
                    StatusCode::GATEWAY_TIMEOUT,
                    "PROVIDER_TIMEOUT",
                    format!("Error generating response: no answer within {}s", limit.as_secs()),
                )
            }
            ChatError::Provider(e) => {
                error!(error = %e, "Completion failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PROVIDER_ERROR",
                    format!("Error generating response: {}", e),
                )
            }
            ChatError::Cancelled => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "SHUTTING_DOWN",
                "Server is shutting down",
            ),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => Self::not_found("SESSION_NOT_FOUND", "Session not found"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "PAYLOAD_TOO_LARGE"
        } else {
            "INVALID_REQUEST"
        };
        Self::new(status, code, rejection.body_text())
    }
}
