//! Business logic services and upstream collaborators.
//!
//! The analyzer depends on three seams, each a trait so the HTTP layer can be
//! exercised without network access:
//! - [`MetadataFetcher`]: platform metadata lookup
//! - [`SuggestionModel`]: generative-model text completion
//! - [`ClipMaterializer`]: turning a time range into a clip URL

pub mod analyzer;
pub mod bilibili;
pub mod gemini;
pub mod materializer;
pub mod youtube;

use async_trait::async_trait;
use inky_models::{Platform, VideoMetadata, VideoReference};
use reqwest::Client;

use crate::config::UpstreamConfig;
use crate::error::{ApiError, ApiResult};

pub use analyzer::VideoAnalyzer;
pub use bilibili::BilibiliClient;
pub use gemini::GeminiClient;
pub use materializer::{materializer_for, DisabledMaterializer, PlaceholderMaterializer};
pub use youtube::YoutubeClient;

/// Looks up platform metadata for a video.
///
/// Fails with [`ApiError::NotFound`] when the platform has no such video and
/// [`ApiError::Upstream`] on transport or HTTP failure.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch_metadata(&self, video: &VideoReference) -> ApiResult<VideoMetadata>;
}

/// Generates free text for a prompt.
#[async_trait]
pub trait SuggestionModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> ApiResult<String>;
}

/// Produces a URL for a clip of `video` between two offsets in seconds.
#[async_trait]
pub trait ClipMaterializer: Send + Sync {
    async fn materialize(
        &self,
        video: &VideoReference,
        start_seconds: u32,
        end_seconds: u32,
    ) -> ApiResult<String>;
}

/// Routes each lookup to the client for the reference's platform.
pub struct PlatformMetadataFetcher {
    youtube: YoutubeClient,
    bilibili: BilibiliClient,
}

impl PlatformMetadataFetcher {
    pub fn new(youtube: YoutubeClient, bilibili: BilibiliClient) -> Self {
        Self { youtube, bilibili }
    }
}

#[async_trait]
impl MetadataFetcher for PlatformMetadataFetcher {
    async fn fetch_metadata(&self, video: &VideoReference) -> ApiResult<VideoMetadata> {
        match video.platform() {
            Platform::YouTube => self.youtube.get_video_details(video.id()).await,
            Platform::Bilibili => self.bilibili.get_video_details(video.id()).await,
        }
    }
}

/// Build the shared HTTP client with the configured per-request timeout.
pub fn http_client(config: &UpstreamConfig) -> ApiResult<Client> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(concat!("inkyclip/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ApiError::internal(format!("Failed to build HTTP client: {}", e)))
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
