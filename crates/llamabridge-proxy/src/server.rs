//! Axum HTTP server for the bridge.
//!
//! This module provides [`router`], which builds the full route tree, and
//! [`serve`], which runs it on a pre-bound listener until cancelled.

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
};
use reqwest::Client;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::{BearerAuth, require_bearer};
use crate::backend::BackendClient;
use crate::config::ProxyConfig;
use crate::forward::forward_api;
use crate::handlers::{chat_completions, health_check, list_models};

/// Shared proxy state, cloned into each handler through Axum `State`.
#[derive(Clone)]
pub(crate) struct ProxyState {
    pub backend: BackendClient,
}

/// Build the router for `config`.
///
/// Every route sits behind bearer authentication.
pub fn router(config: &ProxyConfig) -> anyhow::Result<Router> {
    // Create HTTP client for upstream requests
    let client = Client::builder().pool_max_idle_per_host(10).build()?;

    let state = ProxyState {
        backend: BackendClient::new(client, &config.backend_url),
    };

    let auth = BearerAuth::new(config.api_key.as_deref());
    let auth_layer = middleware::from_fn(move |req: Request, next: Next| {
        let auth = auth.clone();
        async move { require_bearer(auth, req, next).await }
    });

    Ok(Router::new()
        .route("/health", get(health_check))
        .route("/v1/models", get(list_models))
        .route("/v1/chat/completions", post(chat_completions))
        .route("/api/{*path}", post(forward_api))
        .route_layer(auth_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the proxy server with a pre-bound listener.
///
/// Runs until the cancellation token is triggered.
///
/// # Arguments
///
/// * `listener` - Pre-bound TCP listener
/// * `config` - Backend address and API key
/// * `cancel` - Cancellation token for graceful shutdown
pub async fn serve(
    listener: TcpListener,
    config: ProxyConfig,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Proxy server starting on {addr}");

    if config.api_key.is_none() {
        warn!("No API key configured; every request will be rejected with 401");
    }

    let app = router(&config)?;

    info!("Proxy listening on {addr}");
    info!("Forwarding requests to Ollama at: {}", config.backend_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Proxy server shut down");
    Ok(())
}
