//! Command-line surface for the bridge.
//!
//! Every flag can also come from the environment (or a `.env` file loaded
//! before parsing), so `PORT=8080 llamabridge` and `llamabridge --port 8080`
//! are equivalent.

use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use llamabridge_proxy::ProxyConfig;
use llamabridge_proxy::config::{DEFAULT_BACKEND_URL, DEFAULT_PORT};

/// Expose a local Ollama server through the OpenAI chat-completions API.
#[derive(Parser, Debug)]
#[command(name = "llamabridge")]
#[command(version)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Base URL of the Ollama server
    #[arg(long = "ollama-url", env = "OLLAMA_URL", default_value = DEFAULT_BACKEND_URL)]
    pub ollama_url: String,

    /// Bearer token clients must present (every request is rejected when unset)
    #[arg(long = "api-key", env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl Cli {
    /// Turn parsed arguments into the proxy's runtime configuration.
    pub fn into_config(self) -> ProxyConfig {
        let config = ProxyConfig::new(SocketAddr::new(self.host, self.port), self.ollama_url);
        match self.api_key.filter(|key| !key.is_empty()) {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_build_config() {
        let cli = Cli::parse_from([
            "llamabridge",
            "--port",
            "8080",
            "--host",
            "127.0.0.1",
            "--ollama-url",
            "http://gpu-box:11434/",
            "--api-key",
            "sk-local",
        ]);
        let config = cli.into_config();
        assert_eq!(config.listen, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.backend_url, "http://gpu-box:11434");
        assert_eq!(config.api_key.as_deref(), Some("sk-local"));
    }

    #[test]
    fn test_empty_api_key_is_unset() {
        let cli = Cli::parse_from(["llamabridge", "--api-key", ""]);
        assert!(cli.into_config().api_key.is_none());
    }

    #[test]
    fn test_bad_port_rejected() {
        assert!(Cli::try_parse_from(["llamabridge", "--port", "70000"]).is_err());
    }
}
