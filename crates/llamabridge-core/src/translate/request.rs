//! OpenAI request → Ollama request.

use crate::dialect::ollama::{OllamaChatRequest, OllamaOptions};
use crate::dialect::openai::ChatCompletionRequest;

/// Build an Ollama `/api/chat` body from an OpenAI chat request.
///
/// Messages are copied verbatim and in order. Sampling parameters are
/// carried over under Ollama's names only when the client set them; with
/// none set the `options` object is omitted entirely.
pub fn translate_request(req: &ChatCompletionRequest) -> OllamaChatRequest {
    OllamaChatRequest {
        model: req.model.clone(),
        messages: req.messages.clone(),
        stream: req.is_streaming(),
        options: sampling_options(req),
    }
}

fn sampling_options(req: &ChatCompletionRequest) -> Option<OllamaOptions> {
    let options = OllamaOptions {
        temperature: req.temperature,
        top_p: req.top_p,
        num_predict: req.max_tokens,
        frequency_penalty: req.frequency_penalty,
        presence_penalty: req.presence_penalty,
    };
    (!options.is_empty()).then_some(options)
}
