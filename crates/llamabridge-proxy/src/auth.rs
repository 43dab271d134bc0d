//! Bearer-token authentication middleware.

use std::sync::Arc;

use axum::{
    Json,
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// Expected `Authorization` header value, precomputed once at startup.
///
/// `None` means no key is configured and every request is rejected.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    expected: Option<Arc<str>>,
}

impl BearerAuth {
    /// Build the checker from the configured key.
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            expected: api_key.map(|key| Arc::from(format!("Bearer {key}"))),
        }
    }

    /// Whether the given `Authorization` header value is accepted.
    pub fn accepts(&self, header_value: Option<&str>) -> bool {
        match (&self.expected, header_value) {
            (Some(expected), Some(given)) => given == expected.as_ref(),
            _ => false,
        }
    }
}

/// Auth middleware: require `Authorization: Bearer {api key}`.
///
/// Returns 401 with `WWW-Authenticate: Bearer` on failure.
pub async fn require_bearer(auth: BearerAuth, req: Request, next: Next) -> Response {
    let given = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if auth.accepts(given) {
        return next.run(req).await;
    }

    warn!(
        path = %req.uri().path(),
        "Unauthorized request - missing or invalid token"
    );
    let mut res = (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": "Unauthorized" })),
    )
        .into_response();
    res.headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    res
}
