use std::net::SocketAddr;
use std::path::Path;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server settings. Every field has a default, so a TOML file only needs the
/// keys it wants to change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Origin allowed to make cross-origin requests. `None` disables CORS headers.
    pub allowed_origin: Option<String>,
    /// Maximum accepted request body, in bytes.
    pub request_body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            allowed_origin: None,
            request_body_limit: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded server config");
        Self::from_toml_str(&text)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> ServerResult<()> {
        if self.request_body_limit == 0 {
            return Err(ServerError::Config(
                "request_body_limit must be greater than zero".into(),
            ));
        }
        if self.allowed_origin.as_deref() == Some("") {
            return Err(ServerError::Config("allowed_origin must not be empty".into()));
        }
        self.origin_header()?;
        Ok(())
    }

    /// The allowed origin as a header value, if one is configured.
    pub fn origin_header(&self) -> ServerResult<Option<HeaderValue>> {
        self.allowed_origin
            .as_deref()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| {
                    ServerError::Config(format!("invalid allowed_origin {origin:?}: {e}"))
                })
            })
            .transpose()
    }
}
