//! API key configuration.

use serde::{Deserialize, Serialize};

/// Shared-secret authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The API key every client must present. An empty key means the server
    /// is misconfigured and every authenticated route is refused.
    #[serde(default)]
    pub api_key: String,
    /// Request header carrying the key.
    #[serde(default = "default_header")]
    pub header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            header: default_header(),
        }
    }
}

impl AuthConfig {
    /// Whether an API key has been configured.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn default_header() -> String {
    "x-api-key".to_string()
}
