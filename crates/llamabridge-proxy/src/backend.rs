//! HTTP client for the Ollama backend.

use std::sync::Arc;

use axum::http::StatusCode;
use bytes::Bytes;
use reqwest::{Client, Response};
use tracing::{debug, error, warn};

use llamabridge_core::dialect::ollama::{OllamaChatRequest, OllamaTagsResponse};
use llamabridge_core::translate::parse_tags;

use crate::error::{ProxyError, backend_error_message};

/// Thin wrapper over a pooled [`Client`] bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Arc<str>,
}

impl BackendClient {
    /// Create a client for the backend at `base_url` (no trailing slash).
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: Arc::from(base_url),
        }
    }

    /// Full URL for a backend path such as `/api/chat`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The underlying HTTP client.
    pub const fn http(&self) -> &Client {
        &self.client
    }

    /// `POST /api/chat`. Returns the response with its body unread so the
    /// caller can either stream it or collect it.
    pub async fn chat(&self, request: &OllamaChatRequest) -> Result<Response, ProxyError> {
        let url = self.url("/api/chat");
        debug!("Forwarding to {url}");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to connect to backend: {e}");
                ProxyError::Unreachable(e)
            })?;
        ensure_success(response).await
    }

    /// `GET /api/tags`.
    pub async fn tags(&self) -> Result<OllamaTagsResponse, ProxyError> {
        let url = self.url("/api/tags");
        debug!("Forwarding to {url}");
        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("Failed to connect to backend: {e}");
            ProxyError::Unreachable(e)
        })?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read backend tags response: {e}");
            ProxyError::Internal(e.to_string())
        })?;
        Ok(parse_tags(&body)?)
    }
}

/// Turn a non-success backend response into [`ProxyError::Upstream`].
async fn ensure_success(response: Response) -> Result<Response, ProxyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to read backend error body: {e}");
            Bytes::new()
        }
    };
    let message = backend_error_message(&body);
    error!("Upstream error {status}: {message}");
    Err(ProxyError::Upstream {
        status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
        message,
    })
}
