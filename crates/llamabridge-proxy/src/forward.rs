//! Untranslated pass-through for the backend's native `/api/*` routes.
//!
//! Requests are relayed to the backend as-is, and the backend's status,
//! headers and body are relayed back the same way. Which headers cross the
//! bridge in either direction is decided by [`should_forward_header`] alone.

use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{debug, error};

use llamabridge_core::dialect::openai::ErrorResponse;

use crate::server::ProxyState;

/// Headers that are never copied across the bridge.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    // Also strip these for security/correctness
    "host",
    "content-length",
    "authorization", // The bridge's key is not the backend's
];

/// Check if a header should be forwarded.
pub fn should_forward_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    !HOP_BY_HOP_HEADERS.contains(&lower.as_str())
}

/// Forward `POST /api/{path}` to the backend unchanged.
pub(crate) async fn forward_api(
    State(state): State<ProxyState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let upstream_url = state.backend.url(&format!("/api/{path}"));
    debug!("Forwarding to {upstream_url}");

    let mut req_builder = state.backend.http().post(&upstream_url);
    if !headers.contains_key("content-type") {
        req_builder = req_builder.header("content-type", "application/json");
    }

    // Forward allowed headers
    for (name, value) in &headers {
        if should_forward_header(name.as_str()) {
            req_builder = req_builder.header(name.as_str(), value.as_bytes());
        }
    }

    let response = match req_builder.body(body).send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Failed to connect to backend: {e}");
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::upstream_unreachable(&e.to_string())),
            )
                .into_response();
        }
    };

    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = Response::builder().status(status);
    for (name, value) in response.headers() {
        if should_forward_header(name.as_str()) {
            builder = builder.header(name.as_str(), value.as_bytes());
        }
    }

    builder
        .body(Body::from_stream(response.bytes_stream()))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_forward_header() {
        // Should forward
        assert!(should_forward_header("accept"));
        assert!(should_forward_header("content-type"));
        assert!(should_forward_header("x-custom-header"));
        assert!(should_forward_header("User-Agent"));

        // Should NOT forward
        assert!(!should_forward_header("connection"));
        assert!(!should_forward_header("Host"));
        assert!(!should_forward_header("authorization"));
        assert!(!should_forward_header("Authorization"));
        assert!(!should_forward_header("transfer-encoding"));
        assert!(!should_forward_header("content-length"));
    }
}
