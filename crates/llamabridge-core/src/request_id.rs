//! Completion identifiers.

use uuid::Uuid;

/// Prefix shared by every generated id, mirroring OpenAI's own ids.
pub const REQUEST_ID_PREFIX: &str = "chatcmpl-";

const RANDOM_LEN: usize = 29;

/// Generate a fresh completion id, e.g. `chatcmpl-3f2a…`.
///
/// Call once per request; every frame of a stream reuses the same id.
pub fn generate_request_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{REQUEST_ID_PREFIX}{}", &hex[..RANDOM_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_shape() {
        let id = generate_request_id();
        assert!(id.starts_with("chatcmpl-"));
        let suffix = &id[REQUEST_ID_PREFIX.len()..];
        assert_eq!(suffix.len(), 29);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_request_ids_differ() {
        assert_ne!(generate_request_id(), generate_request_id());
    }
}
