//! Translation core for llamabridge.
//!
//! Clients speak the OpenAI chat-completions dialect; the backend is an
//! Ollama server speaking its native `/api/chat` dialect. This crate holds
//! the types for both dialects and the pure translation logic between them:
//!
//! - [`translate::translate_request`] maps an OpenAI request onto Ollama.
//! - [`translate::translate_response`] and [`translate::translate_models`]
//!   map complete Ollama responses back.
//! - [`reframe::StreamReframer`] turns Ollama's NDJSON stream into OpenAI
//!   SSE events, one network chunk at a time.
//!
//! Nothing here performs I/O; the HTTP plumbing lives in `llamabridge-proxy`.

#![deny(unsafe_code)]

pub mod dialect;
pub mod error;
pub mod reframe;
pub mod request_id;
pub mod translate;

pub use dialect::{ChatMessage, Role};
pub use error::TranslateError;
pub use reframe::{StreamEvent, StreamReframer};
pub use request_id::generate_request_id;
