//! Wire types for both sides of the bridge.
//!
//! [`openai`] is the public dialect clients speak, [`ollama`] is the
//! backend's native dialect. The message type is shared: both dialects
//! encode a chat turn as `{"role": ..., "content": ...}`.

pub mod ollama;
pub mod openai;

use serde::{Deserialize, Serialize};

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a message with the given role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}
