//! Application state.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::services::{
    http_client, materializer_for, BilibiliClient, ClipMaterializer, GeminiClient,
    PlatformMetadataFetcher, VideoAnalyzer, YoutubeClient,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub analyzer: Arc<VideoAnalyzer>,
    pub materializer: Arc<dyn ClipMaterializer>,
}

impl AppState {
    /// Create application state with the real upstream clients.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = http_client(&config.upstream)?;

        let fetcher = PlatformMetadataFetcher::new(
            YoutubeClient::new(&config.upstream, client.clone())?,
            BilibiliClient::new(&config.upstream, client.clone()),
        );
        let model = GeminiClient::new(&config.upstream, client)?;
        let analyzer = VideoAnalyzer::new(Arc::new(fetcher), Arc::new(model));
        let materializer = materializer_for(&config);

        Ok(Self::from_parts(config, analyzer, materializer))
    }

    /// Assemble state from already-built collaborators.
    pub fn from_parts(
        config: ApiConfig,
        analyzer: VideoAnalyzer,
        materializer: Arc<dyn ClipMaterializer>,
    ) -> Self {
        Self {
            config,
            analyzer: Arc::new(analyzer),
            materializer,
        }
    }
}
