//! In-process fake Ollama backend and request helpers.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use http_body_util::BodyExt;
use llamabridge_proxy::{ProxyConfig, router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const API_KEY: &str = "test-key";

/// NDJSON the fake backend streams, including one malformed line.
pub const STREAM_LINES: &[&str] = &[
    "{\"model\":\"llama3\",\"created_at\":\"2024-05-01T12:00:00.1Z\",\"message\":{\"role\":\"assistant\",\"content\":\"Hel\"},\"done\":false}\n",
    "{\"model\":\"llama3\",\"created_at\":\"2024-05-01T12:00:00.2Z\",\"message\":{\"role\":\"assistant\",\"content\":\"lo ✓\"},\"done\":false}\n",
    "{oops\n",
    "{\"model\":\"llama3\",\"created_at\":\"2024-05-01T12:00:00.3Z\",\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true,\"done_reason\":\"stop\",\"prompt_eval_count\":10,\"eval_count\":5}\n",
];

/// Start a fake Ollama on an ephemeral port and return its base URL.
pub async fn spawn_fake_ollama() -> String {
    let app = Router::new()
        .route("/api/chat", post(fake_chat))
        .route("/api/tags", get(fake_tags))
        .route("/api/show", post(fake_show));

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("fake backend addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

/// `/api/chat`: streams [`STREAM_LINES`] in 7-byte chunks, or answers with a
/// single record whose content echoes the request body it received.
async fn fake_chat(Json(body): Json<Value>) -> Response {
    match body["model"].as_str() {
        Some("missing") => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "model 'missing' not found" })),
            )
                .into_response();
        }
        Some("garbage") => return "this is not json".into_response(),
        _ => {}
    }

    if body["stream"] == json!(true) {
        let ndjson = STREAM_LINES.concat().into_bytes();
        let chunks: Vec<Result<Bytes, Infallible>> = ndjson
            .chunks(7)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        return Response::builder()
            .header("content-type", "application/x-ndjson")
            .body(Body::from_stream(futures_util::stream::iter(chunks)))
            .expect("fake stream response");
    }

    Json(json!({
        "model": body["model"],
        "created_at": "2024-05-01T12:00:00.999Z",
        "message": { "role": "assistant", "content": body.to_string() },
        "done": true,
        "done_reason": "stop",
        "prompt_eval_count": 10,
        "eval_count": 5,
    }))
    .into_response()
}

async fn fake_tags() -> impl IntoResponse {
    Json(json!({
        "models": [
            {
                "name": "llama3:latest",
                "model": "llama3:latest",
                "modified_at": "2024-05-01T12:00:00.5+00:00",
                "size": 4_661_224_676_u64,
                "digest": "365c0bd3c000"
            }
        ]
    }))
}

/// `/api/show`: reports what it received and tags the response.
async fn fake_show(headers: HeaderMap, body: Bytes) -> Response {
    let report = json!({
        "saw_authorization": headers.contains_key("authorization"),
        "custom": headers.get("x-custom").and_then(|v| v.to_str().ok()),
        "body": String::from_utf8_lossy(&body),
    });
    (StatusCode::ACCEPTED, [("x-backend", "fake")], Json(report)).into_response()
}

/// Build the bridge router pointing at `backend_url`.
pub fn app(backend_url: &str) -> Router {
    let config = ProxyConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)), backend_url)
        .with_api_key(API_KEY);
    router(&config).expect("router")
}

/// Authorized POST with a JSON body.
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {API_KEY}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Authorized GET.
pub fn get_authed(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {API_KEY}"))
        .body(Body::empty())
        .expect("request")
}

/// Send one request through `app` and collect the whole response.
pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.oneshot(req).await.expect("infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, headers, body)
}
