//! Fetch + decode pipeline with a decoded-bitmap cache.

use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;
use tracing::debug;

use renderhub_cache::TtlCache;
use renderhub_core::config::AssetsConfig;
use renderhub_core::error::{AppError, ErrorKind};
use renderhub_core::result::AppResult;

use crate::fetcher::AssetFetcher;

/// Turns asset URLs into ready-to-blit RGBA bitmaps.
///
/// Decoded bitmaps are cached keyed by source URL under a separately
/// budgeted policy (typically half the byte cache's size).
#[derive(Debug, Clone)]
pub struct AssetPipeline {
    fetcher: AssetFetcher,
    images: TtlCache<Arc<RgbaImage>>,
}

impl AssetPipeline {
    /// Build the pipeline from configuration.
    pub fn new(config: &AssetsConfig) -> AppResult<Self> {
        Ok(Self {
            fetcher: AssetFetcher::new(config)?,
            images: TtlCache::new(
                config.image_cache_max_items,
                Duration::from_millis(config.byte_cache_ttl_ms),
            ),
        })
    }

    /// Fetch (with extension fallback) and decode one asset.
    pub async fn load_image(&self, url: &str) -> AppResult<Arc<RgbaImage>> {
        if let Some(hit) = self.images.get(url).await {
            debug!(url, "Decoded image cache hit");
            return Ok(hit);
        }

        let bytes = self.fetcher.fetch_with_extension_fallback(url).await?;

        // Decoding is CPU-bound; keep it off the async worker threads.
        let decoded = tokio::task::spawn_blocking(move || decode_rgba(&bytes))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Decode task panicked", e))??;

        let decoded = Arc::new(decoded);
        self.images.insert(url.to_string(), decoded.clone()).await;
        Ok(decoded)
    }

    /// The underlying byte fetcher.
    pub fn fetcher(&self) -> &AssetFetcher {
        &self.fetcher
    }
}

fn decode_rgba(bytes: &[u8]) -> AppResult<RgbaImage> {
    let dynamic = image::load_from_memory(bytes)
        .map_err(|e| AppError::with_source(ErrorKind::Decode, format!("Decode failed: {e}"), e))?;
    Ok(dynamic.to_rgba8())
}
