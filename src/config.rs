use std::env;
use std::fmt;

use crate::calendly::client::DEFAULT_BASE_URL;

const DEFAULT_MCP_PORT: u16 = 5233;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("CALENDLY_API_KEY environment variable is required")]
    MissingApiKey,
    #[error("MCP_PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub mcp_port: u16,
    pub auth_token: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("mcp_port", &self.mcp_port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("CALENDLY_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let api_base = non_empty("CALENDLY_API_BASE").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mcp_port = match non_empty("MCP_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_MCP_PORT,
        };

        Ok(Self {
            api_key,
            api_base,
            mcp_port,
            auth_token: non_empty("MCP_AUTH_TOKEN"),
        })
    }
}
