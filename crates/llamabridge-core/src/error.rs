//! Errors raised while decoding backend payloads or encoding public ones.

use thiserror::Error;

/// Translation failures.
///
/// Request translation is total and never fails; these only arise at the
/// serialization edges around it.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The backend sent a body that is not a valid record of the expected shape.
    #[error("invalid backend response: {0}")]
    InvalidBackendResponse(#[from] serde_json::Error),

    /// A public stream frame could not be serialized.
    #[error("failed to encode stream frame: {0}")]
    Encode(serde_json::Error),
}
