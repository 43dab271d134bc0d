//! Proxy error types and their HTTP mapping.
//!
//! Every variant renders as an OpenAI-style error envelope so clients can
//! handle bridge failures the same way they handle OpenAI's own.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use llamabridge_core::TranslateError;
use llamabridge_core::dialect::openai::ErrorResponse;
use thiserror::Error;

/// Failures scoped to a single request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The client body is not a valid chat request.
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    /// The backend could not be reached at all.
    #[error("Failed to connect to backend: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    /// Anything else that went wrong inside the bridge.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Status code this error is reported with.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unreachable(_) => StatusCode::BAD_GATEWAY,
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            Self::InvalidRequest(msg) => ErrorResponse::invalid_request(msg.clone()),
            Self::Unreachable(e) => ErrorResponse::upstream_unreachable(&e.to_string()),
            Self::Upstream { status, message } => {
                ErrorResponse::upstream_status(status.as_u16(), message)
            }
            Self::Internal(msg) => ErrorResponse::internal(msg.clone()),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<TranslateError> for ProxyError {
    fn from(err: TranslateError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Pull a readable message out of a backend error body.
///
/// Ollama reports errors as `{"error": "..."}`; anything else is passed on
/// as text.
pub(crate) fn backend_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string())
}
