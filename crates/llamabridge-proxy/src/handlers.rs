//! OpenAI-dialect route handlers.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{debug, error, info};

use llamabridge_core::dialect::openai::{ChatCompletionRequest, ModelsResponse};
use llamabridge_core::generate_request_id;
use llamabridge_core::translate::{
    parse_chat_record, translate_models, translate_request, translate_response,
};

use crate::error::ProxyError;
use crate::server::ProxyState;
use crate::stream;

/// Health check endpoint.
pub(crate) async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// List the backend's local models in OpenAI format.
pub(crate) async fn list_models(
    State(state): State<ProxyState>,
) -> Result<Json<ModelsResponse>, ProxyError> {
    debug!("GET /v1/models");
    let tags = state.backend.tags().await?;
    Ok(Json(translate_models(&tags)))
}

/// Handle chat completions: translate, call the backend, translate back.
pub(crate) async fn chat_completions(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Response, ProxyError> {
    debug!("POST /v1/chat/completions");

    let request: ChatCompletionRequest = serde_json::from_slice(&body).map_err(|e| {
        error!("Failed to parse request: {e}");
        ProxyError::InvalidRequest(e.to_string())
    })?;

    let request_id = generate_request_id();
    let is_streaming = request.is_streaming();

    info!(
        request_id = %request_id,
        model = %request.model,
        streaming = %is_streaming,
        messages = request.messages.len(),
        "Processing chat completion request"
    );

    let backend_request = translate_request(&request);
    let upstream = state.backend.chat(&backend_request).await?;

    if is_streaming {
        return Ok(stream::stream_chat_response(upstream, request_id, request.model));
    }

    let bytes = upstream.bytes().await.map_err(|e| {
        error!("Failed to read backend response: {e}");
        ProxyError::Internal(format!("Failed to read backend response: {e}"))
    })?;
    let record = parse_chat_record(&bytes).map_err(|e| {
        error!(request_id = %request_id, "Failed to parse backend response: {e}");
        ProxyError::from(e)
    })?;

    Ok(Json(translate_response(&record, &request_id, &request.model)).into_response())
}
