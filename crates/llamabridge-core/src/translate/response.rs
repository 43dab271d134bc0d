//! Ollama responses → OpenAI responses.

use crate::dialect::ollama::{OllamaChatRecord, OllamaTagsResponse};
use crate::dialect::openai::{
    CHAT_COMPLETION_CHUNK_OBJECT, CHAT_COMPLETION_OBJECT, ChatChoice, ChatChunkChoice,
    ChatCompletionChunk, ChatCompletionResponse, ChatDelta, FinishReason, LIST_OBJECT,
    MODEL_OBJECT, ModelInfo, ModelsResponse, Usage,
};
use crate::dialect::{ChatMessage, Role};
use crate::error::TranslateError;

use super::{OWNED_BY, epoch_seconds};

/// Decode a complete `/api/chat` body.
pub fn parse_chat_record(body: &[u8]) -> Result<OllamaChatRecord, TranslateError> {
    Ok(serde_json::from_slice(body)?)
}

/// Decode a complete `/api/tags` body.
pub fn parse_tags(body: &[u8]) -> Result<OllamaTagsResponse, TranslateError> {
    Ok(serde_json::from_slice(body)?)
}

/// Map a finished backend record onto one OpenAI chat completion.
///
/// `request_id` and `model` come from the caller so that translating the
/// same record twice yields the same response.
pub fn translate_response(
    record: &OllamaChatRecord,
    request_id: &str,
    model: &str,
) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: request_id.to_string(),
        object: CHAT_COMPLETION_OBJECT.to_string(),
        created: epoch_seconds(&record.created_at),
        model: model.to_string(),
        choices: vec![ChatChoice {
            index: 0,
            message: ChatMessage::new(Role::Assistant, record.message.content.clone()),
            finish_reason: finish_reason(record),
        }],
        usage: Usage::new(
            record.prompt_eval_count.unwrap_or(0),
            record.eval_count.unwrap_or(0),
        ),
    }
}

/// Map one streamed backend record onto one OpenAI stream frame.
///
/// Only the first frame of a stream announces the assistant role.
pub fn translate_stream_record(
    record: &OllamaChatRecord,
    request_id: &str,
    model: &str,
    first: bool,
) -> ChatCompletionChunk {
    ChatCompletionChunk {
        id: request_id.to_string(),
        object: CHAT_COMPLETION_CHUNK_OBJECT.to_string(),
        created: epoch_seconds(&record.created_at),
        model: model.to_string(),
        choices: vec![ChatChunkChoice {
            index: 0,
            delta: ChatDelta {
                role: first.then_some(Role::Assistant),
                content: Some(record.message.content.clone()),
            },
            finish_reason: finish_reason(record),
        }],
    }
}

/// Map the backend's local model list onto the OpenAI listing.
pub fn translate_models(tags: &OllamaTagsResponse) -> ModelsResponse {
    ModelsResponse {
        object: LIST_OBJECT.to_string(),
        data: tags
            .models
            .iter()
            .map(|model| ModelInfo {
                id: model.name.clone(),
                object: MODEL_OBJECT.to_string(),
                created: epoch_seconds(&model.modified_at),
                owned_by: OWNED_BY.to_string(),
            })
            .collect(),
    }
}

fn finish_reason(record: &OllamaChatRecord) -> Option<FinishReason> {
    if !record.done {
        return None;
    }
    match record.done_reason.as_deref() {
        Some("length") => Some(FinishReason::Length),
        _ => Some(FinishReason::Stop),
    }
}
