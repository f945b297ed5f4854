//! Clip materializers.
//!
//! No media processing happens here. The placeholder implementation only
//! builds a deterministic URL from the request.

use std::sync::Arc;

use async_trait::async_trait;
use inky_models::VideoReference;
use tracing::debug;

use crate::config::{ApiConfig, MaterializerMode};
use crate::error::{ApiError, ApiResult};
use crate::services::ClipMaterializer;

/// Returns `{base_url}/{video_id}_{start}_{end}.mp4`.
pub struct PlaceholderMaterializer {
    base_url: String,
}

impl PlaceholderMaterializer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ClipMaterializer for PlaceholderMaterializer {
    async fn materialize(
        &self,
        video: &VideoReference,
        start_seconds: u32,
        end_seconds: u32,
    ) -> ApiResult<String> {
        debug!(video = %video, start_seconds, end_seconds, "Building placeholder clip URL");
        Ok(format!(
            "{}/{}_{}_{}.mp4",
            self.base_url,
            video.id(),
            start_seconds,
            end_seconds
        ))
    }
}

/// Rejects every request.
pub struct DisabledMaterializer;

#[async_trait]
impl ClipMaterializer for DisabledMaterializer {
    async fn materialize(&self, _: &VideoReference, _: u32, _: u32) -> ApiResult<String> {
        Err(ApiError::unimplemented("Clip download is not available"))
    }
}

/// Pick the materializer selected by `CLIP_MATERIALIZER`.
pub fn materializer_for(config: &ApiConfig) -> Arc<dyn ClipMaterializer> {
    match config.materializer {
        MaterializerMode::Placeholder => {
            Arc::new(PlaceholderMaterializer::new(config.clip_base_url.clone()))
        }
        MaterializerMode::Disabled => Arc::new(DisabledMaterializer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_placeholder_url() {
        let materializer = PlaceholderMaterializer::new("https://example.com/clips/");
        let video = VideoReference::from_id("dQw4w9WgXcQ").unwrap();
        let url = materializer.materialize(&video, 10, 25).await.unwrap();
        assert_eq!(url, "https://example.com/clips/dQw4w9WgXcQ_10_25.mp4");
    }

    #[tokio::test]
    async fn test_disabled_is_unimplemented() {
        let video = VideoReference::from_id("BV1xx411c7mD").unwrap();
        let err = DisabledMaterializer.materialize(&video, 0, 5).await.unwrap_err();
        assert!(matches!(err, ApiError::Unimplemented(_)));
    }

    #[tokio::test]
    async fn test_materializer_for_mode() {
        let video = VideoReference::from_id("dQw4w9WgXcQ").unwrap();

        let placeholder = materializer_for(&ApiConfig::default());
        assert!(placeholder.materialize(&video, 1, 2).await.is_ok());

        let config = ApiConfig {
            materializer: MaterializerMode::Disabled,
            ..ApiConfig::default()
        };
        assert!(materializer_for(&config).materialize(&video, 1, 2).await.is_err());
    }
}
