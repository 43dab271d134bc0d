//! NDJSON → SSE streaming adapter.
//!
//! Wires the backend's byte stream through a [`StreamReframer`] and hands
//! the resulting SSE events to the client as they complete. Dropping the
//! returned body (client disconnect) drops the backend response with it,
//! which closes the backend connection.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt::Display;

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::{debug, warn};

use llamabridge_core::{StreamEvent, StreamReframer};

/// Translate a streaming backend `/api/chat` response into an SSE response.
pub fn stream_chat_response(
    upstream: reqwest::Response,
    request_id: String,
    model: String,
) -> Response {
    let reframer = StreamReframer::new(request_id, model);
    let sse_stream = reframe_stream(upstream.bytes_stream(), reframer);

    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/event-stream")
        .header("cache-control", "no-cache")
        .header("x-accel-buffering", "no") // Disable nginx buffering
        .body(Body::from_stream(sse_stream))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// State threaded through the `unfold` stream.
struct SseState<S> {
    stream: S,
    reframer: StreamReframer,
    pending: VecDeque<Bytes>,
    /// No more backend reads once set; `pending` is still drained.
    done: bool,
}

impl<S> SseState<S> {
    fn enqueue(&mut self, events: Vec<StreamEvent>) {
        for event in events {
            match event.to_sse() {
                Ok(bytes) => self.pending.push_back(bytes),
                Err(e) => warn!("Dropping unencodable stream frame: {e}"),
            }
        }
    }
}

/// Convert a backend NDJSON byte stream into SSE event bytes.
///
/// Events are yielded in backend order. The stream ends after the `[DONE]`
/// sentinel. A transport error ends it silently: whatever was already
/// emitted stands and nothing else follows.
pub fn reframe_stream<S, E>(
    byte_stream: S,
    reframer: StreamReframer,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = SseState {
        stream: byte_stream.boxed(),
        reframer,
        pending: VecDeque::new(),
        done: false,
    };

    futures_util::stream::unfold(state, |mut st| async move {
        loop {
            if let Some(bytes) = st.pending.pop_front() {
                return Some((Ok(bytes), st));
            }
            if st.done {
                return None;
            }

            // Need more data from upstream.
            match st.stream.next().await {
                Some(Ok(chunk)) => {
                    let events = st.reframer.push(&chunk);
                    st.enqueue(events);
                }
                Some(Err(e)) => {
                    warn!("Backend stream error, closing client stream: {e}");
                    st.done = true;
                }
                None => {
                    let events = st.reframer.finish();
                    st.enqueue(events);
                    st.done = true;
                }
            }

            if st.reframer.is_finished() && !st.done {
                debug!("Backend sent done record; closing stream");
                st.done = true;
            }
        }
    })
}
