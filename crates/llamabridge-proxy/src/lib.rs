//! OpenAI-compatible HTTP front end for an Ollama backend.
//!
//! Routes:
//!
//! | route                       | behaviour                                      |
//! |-----------------------------|------------------------------------------------|
//! | `GET  /health`              | liveness probe                                 |
//! | `GET  /v1/models`           | backend `/api/tags`, translated                |
//! | `POST /v1/chat/completions` | backend `/api/chat`, translated (SSE or JSON)  |
//! | `POST /api/{*path}`         | forwarded to the backend untouched             |
//!
//! Every route requires `Authorization: Bearer <api key>`.

#![deny(unsafe_code)]

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod forward;
mod handlers;
pub mod server;
pub mod stream;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use server::{router, serve};
