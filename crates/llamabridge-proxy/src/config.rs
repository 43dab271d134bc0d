//! Runtime configuration for the proxy.

use std::fmt;
use std::net::SocketAddr;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default Ollama base URL.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:11434";

/// Proxy configuration, read-only after startup.
#[derive(Clone)]
pub struct ProxyConfig {
    /// Address the HTTP server binds to.
    pub listen: SocketAddr,
    /// Ollama base URL without trailing slash, e.g. `http://localhost:11434`.
    pub backend_url: String,
    /// Bearer token clients must present. `None` rejects every request.
    pub api_key: Option<String>,
}

impl ProxyConfig {
    /// Create a config with no API key.
    pub fn new(listen: SocketAddr, backend_url: impl Into<String>) -> Self {
        Self {
            listen,
            backend_url: normalize_base_url(backend_url.into()),
            api_key: None,
        }
    }

    /// Set the bearer token clients must present.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new(
            SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            DEFAULT_BACKEND_URL,
        )
    }
}

// Keep the key out of logs.
impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("listen", &self.listen)
            .field("backend_url", &self.backend_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn normalize_base_url(url: String) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.len() == url.len() {
        url
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.listen.port(), 3000);
        assert_eq!(config.backend_url, "http://localhost:11434");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config = ProxyConfig::new(
            SocketAddr::from(([127, 0, 0, 1], 0)),
            "http://ollama:11434//",
        );
        assert_eq!(config.backend_url, "http://ollama:11434");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ProxyConfig::default().with_api_key("sk-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
