//! Byte-level asset fetcher.
//!
//! Accepts `http://`, `https://`, and `data:<media>;base64,<payload>`
//! URLs. Network results are held in a TTL cache keyed by URL; failures
//! on `.png`/`.gif` URLs are retried once with the extension swapped.

use std::time::Duration;

use base64::Engine;
use bytes::Bytes;
use tracing::debug;

use renderhub_cache::TtlCache;
use renderhub_core::config::AssetsConfig;
use renderhub_core::error::{AppError, ErrorKind};
use renderhub_core::result::AppResult;

/// Fetches asset bytes with caching and extension fallback.
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    /// Shared HTTP client (keep-alive, bounded idle pool, timeout).
    client: reqwest::Client,
    /// Fetched bytes keyed by URL.
    bytes: TtlCache<Bytes>,
}

impl AssetFetcher {
    /// Build a fetcher from configuration.
    pub fn new(config: &AssetsConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .pool_max_idle_per_host(config.max_idle_connections_per_host)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        let bytes = TtlCache::new(
            config.byte_cache_max_items,
            Duration::from_millis(config.byte_cache_ttl_ms),
        );

        Ok(Self { client, bytes })
    }

    /// Fetch a URL, consulting the byte cache for network URLs.
    pub async fn fetch(&self, url: &str) -> AppResult<Bytes> {
        if url.starts_with("data:") {
            return decode_data_url(url).map(Bytes::from);
        }

        if let Some(hit) = self.bytes.get(url).await {
            debug!(url, "Byte cache hit");
            return Ok(hit);
        }

        let fetched = self.fetch_network(url).await?;
        self.bytes.insert(url.to_string(), fetched.clone()).await;
        Ok(fetched)
    }

    /// Fetch a URL; on failure retry once with `.png`↔`.gif` swapped.
    ///
    /// If the retry also fails, the original error propagates.
    pub async fn fetch_with_extension_fallback(&self, url: &str) -> AppResult<Bytes> {
        let original = match self.fetch(url).await {
            Ok(bytes) => return Ok(bytes),
            Err(err) => err,
        };

        if let Some(alternate) = swap_extension(url) {
            match self.fetch(&alternate).await {
                Ok(bytes) => {
                    debug!(url, alternate, "Extension fallback hit");
                    return Ok(bytes);
                }
                Err(retry_err) => {
                    debug!(url, alternate, error = %retry_err, "Extension fallback missed");
                }
            }
        }

        Err(original)
    }

    async fn fetch_network(&self, url: &str) -> AppResult<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_transport_error(url, e))?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(AppError::upstream(status.as_u16(), url));
        }

        response
            .bytes()
            .await
            .map_err(|e| map_transport_error(url, e))
    }
}

fn map_transport_error(url: &str, err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::timeout(format!("GET {url} timed out"))
    } else {
        AppError::with_source(ErrorKind::Fetch, format!("GET {url} failed: {err}"), err)
    }
}

/// Swap a trailing `.png`↔`.gif` extension, preserving any query string.
pub fn swap_extension(url: &str) -> Option<String> {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };

    let swapped = if let Some(stem) = path.strip_suffix(".png") {
        format!("{stem}.gif")
    } else if let Some(stem) = path.strip_suffix(".gif") {
        format!("{stem}.png")
    } else {
        return None;
    };

    Some(match query {
        Some(query) => format!("{swapped}?{query}"),
        None => swapped,
    })
}

/// Decode a `data:<media>;base64,<payload>` URL.
fn decode_data_url(url: &str) -> AppResult<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| AppError::invalid_data_url("URL does not start with 'data:'"))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::invalid_data_url("Missing comma in data URL"))?;

    if !header.ends_with(";base64") {
        return Err(AppError::invalid_data_url(format!(
            "Unsupported data URL header: {header}"
        )));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| AppError::invalid_data_url(format!("Invalid base64 payload: {e}")))
}
