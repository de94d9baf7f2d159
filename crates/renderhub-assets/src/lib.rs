//! # renderhub-assets
//!
//! Asset acquisition for the render pipeline: a byte-level fetcher with a
//! TTL cache and `.png`↔`.gif` extension fallback, plus a decoder cache
//! that maps source URLs to ready-to-blit RGBA bitmaps.

pub mod fetcher;
pub mod pipeline;

pub use fetcher::AssetFetcher;
pub use pipeline::AssetPipeline;
