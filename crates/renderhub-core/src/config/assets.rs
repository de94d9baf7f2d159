//! Asset CDN and fetch-cache configuration.

use serde::{Deserialize, Serialize};

/// Asset fetching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// CDN base URL layer paths are resolved against (no trailing slash).
    /// Mandatory: startup fails when empty.
    #[serde(default)]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Maximum idle keep-alive sockets per host.
    #[serde(default = "default_max_idle_per_host")]
    pub max_idle_connections_per_host: usize,
    /// TTL for the fetched-bytes cache in milliseconds.
    #[serde(default = "default_byte_cache_ttl_ms")]
    pub byte_cache_ttl_ms: u64,
    /// Maximum entry count for the fetched-bytes cache.
    #[serde(default = "default_byte_cache_max_items")]
    pub byte_cache_max_items: u64,
    /// Maximum entry count for the decoded-image cache.
    #[serde(default = "default_image_cache_max_items")]
    pub image_cache_max_items: u64,
    /// Bounded fan-out for single-URL layer fetches in one compose call.
    #[serde(default = "default_static_fetch_concurrency")]
    pub static_fetch_concurrency: usize,
    /// Bounded fan-out for animated-layer frame fetches in one compose call.
    #[serde(default = "default_frame_fetch_concurrency")]
    pub frame_fetch_concurrency: usize,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            request_timeout_ms: default_request_timeout_ms(),
            max_idle_connections_per_host: default_max_idle_per_host(),
            byte_cache_ttl_ms: default_byte_cache_ttl_ms(),
            byte_cache_max_items: default_byte_cache_max_items(),
            image_cache_max_items: default_image_cache_max_items(),
            static_fetch_concurrency: default_static_fetch_concurrency(),
            frame_fetch_concurrency: default_frame_fetch_concurrency(),
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    15_000
}

fn default_max_idle_per_host() -> usize {
    50
}

fn default_byte_cache_ttl_ms() -> u64 {
    60_000
}

fn default_byte_cache_max_items() -> u64 {
    1000
}

fn default_image_cache_max_items() -> u64 {
    500
}

fn default_static_fetch_concurrency() -> usize {
    10
}

fn default_frame_fetch_concurrency() -> usize {
    10
}
