//! HTTP server configuration.

use serde::{Deserialize, Serialize};

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL used when composing artifact URLs (no trailing slash).
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Optional bearer token. When set, both job endpoints require
    /// `Authorization: Bearer <token>`.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Maximum accepted JSON body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: default_public_base_url(),
            api_token: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_public_base_url() -> String {
    format!("http://localhost:{}", default_port())
}

fn default_max_body_bytes() -> usize {
    8 * 1024 * 1024
}
