//! Field-level translation between the two dialects.
//!
//! Every function here is pure: same input, same output. The request id is
//! always supplied by the caller so responses stay reproducible.

mod request;
mod response;

pub use request::translate_request;
pub use response::{
    parse_chat_record, parse_tags, translate_models, translate_response, translate_stream_record,
};

use chrono::DateTime;
use tracing::warn;

/// Owner label reported for every backend model.
pub const OWNED_BY: &str = "ollama";

/// Parse an RFC 3339 backend timestamp into whole epoch seconds.
///
/// Sub-second precision is truncated. An unparseable value yields 0 rather
/// than failing the whole record.
pub fn epoch_seconds(timestamp: &str) -> i64 {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.timestamp(),
        Err(e) => {
            warn!(timestamp = %timestamp, error = %e, "Unparseable backend timestamp");
            0
        }
    }
}
