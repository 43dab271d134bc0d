//! OpenAI chat-completions data models.
//!
//! These types match the subset of the OpenAI API that the bridge accepts
//! and produces: chat completions (plain and streamed), the model listing,
//! and the error envelope.

use serde::{Deserialize, Serialize};

use super::{ChatMessage, Role};

/// `object` tag of a non-streaming chat completion.
pub const CHAT_COMPLETION_OBJECT: &str = "chat.completion";
/// `object` tag of a streamed chat completion frame.
pub const CHAT_COMPLETION_CHUNK_OBJECT: &str = "chat.completion.chunk";
/// `object` tag of a model listing.
pub const LIST_OBJECT: &str = "list";
/// `object` tag of a single model entry.
pub const MODEL_OBJECT: &str = "model";

// =============================================================================
// Chat Completion Request/Response Types
// =============================================================================

/// Request to the /v1/chat/completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model name to use.
    pub model: String,
    /// Conversation so far, in turn order.
    pub messages: Vec<ChatMessage>,
    /// Whether to stream the response. Absent means no.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Sampling temperature (0-2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Top-p sampling parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
}

impl ChatCompletionRequest {
    /// Whether the client asked for a streamed response.
    pub fn is_streaming(&self) -> bool {
        self.stream.unwrap_or(false)
    }
}

/// Why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
}

/// Response from /v1/chat/completions (non-streaming).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
}

/// A single chat completion choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    /// Serialized as `null` while generation has not finished.
    pub finish_reason: Option<FinishReason>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    /// Build usage from the two reported counters; the total is always derived.
    pub const fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

// =============================================================================
// Streaming Types
// =============================================================================

/// Streaming frame from /v1/chat/completions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChunkChoice>,
}

/// A single streaming choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChunkChoice {
    pub index: u32,
    pub delta: ChatDelta,
    /// Non-null only on the terminal frame.
    pub finish_reason: Option<FinishReason>,
}

/// Incremental content in a streaming frame.
///
/// The first frame of a stream carries the role; later frames carry content only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// =============================================================================
// Models Endpoint Types
// =============================================================================

/// Response from the /v1/models endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<ModelInfo>,
}

/// Information about a single model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

// =============================================================================
// Error Response Types
// =============================================================================

/// Error response matching OpenAI format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail within an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                r#type: error_type.into(),
                code: None,
            },
        }
    }

    /// Create an error response with a code.
    pub fn with_code(
        message: impl Into<String>,
        error_type: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                r#type: error_type.into(),
                code: Some(code.into()),
            },
        }
    }

    /// The request body could not be understood.
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(reason, "invalid_request_error")
    }

    /// The backend could not be reached.
    pub fn upstream_unreachable(reason: &str) -> Self {
        Self::with_code(
            format!("Failed to connect to backend: {reason}"),
            "server_error",
            "upstream_error",
        )
    }

    /// The backend answered with a non-success status.
    pub fn upstream_status(status: u16, message: &str) -> Self {
        Self::with_code(
            format!("Backend returned {status}: {message}"),
            "server_error",
            "upstream_error",
        )
    }

    /// Anything else that went wrong inside the bridge.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::new(reason, "internal_error")
    }
}
