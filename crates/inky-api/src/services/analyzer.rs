//! The analyze pipeline: URL → metadata → prompt → model text → suggestions.

use std::sync::Arc;

use inky_models::{
    build_prompt, extract_video_reference, parse_blocks, AnalysisResult, BlockOutcome,
    ClipSuggestion,
};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::services::{MetadataFetcher, SuggestionModel};

/// Slack allowed past the reported duration before an overrun is logged.
const DURATION_TOLERANCE_SECS: u32 = 1;

/// Runs one analysis per call. Holds no per-request state.
pub struct VideoAnalyzer {
    fetcher: Arc<dyn MetadataFetcher>,
    model: Arc<dyn SuggestionModel>,
}

impl VideoAnalyzer {
    pub fn new(fetcher: Arc<dyn MetadataFetcher>, model: Arc<dyn SuggestionModel>) -> Self {
        Self { fetcher, model }
    }

    /// Analyze a video page URL.
    pub async fn analyze(&self, url: &str) -> ApiResult<AnalysisResult> {
        let result = self.run(url).await;
        match &result {
            Ok(_) => metrics::record_analysis("success"),
            Err(e) => metrics::record_analysis(e.kind()),
        }
        result
    }

    async fn run(&self, url: &str) -> ApiResult<AnalysisResult> {
        let video = extract_video_reference(url)
            .ok_or_else(|| ApiError::bad_request("Invalid video URL"))?;

        info!(video = %video, "Analyzing video");

        let metadata = self.fetcher.fetch_metadata(&video).await?;
        let prompt = build_prompt(&metadata);
        let text = self.model.generate(&prompt).await?;

        let mut suggestions = Vec::new();
        let mut skipped = 0u64;
        for outcome in parse_blocks(&text) {
            match outcome {
                BlockOutcome::Parsed(suggestion) => suggestions.push(suggestion),
                BlockOutcome::Skipped { index, reason } => {
                    skipped += 1;
                    warn!(video = %video, block = index, reason = %reason, "Skipping malformed suggestion block");
                }
            }
        }
        if skipped > 0 {
            metrics::record_suggestions_skipped(skipped);
        }

        if let Some(duration) = metadata.duration_seconds() {
            warn_on_overruns(&suggestions, duration);
        }

        info!(
            video = %video,
            suggestions = suggestions.len(),
            skipped,
            "Analysis complete"
        );

        Ok(AnalysisResult::new(video, metadata, suggestions))
    }
}

fn warn_on_overruns(suggestions: &[ClipSuggestion], duration: u32) {
    let limit = duration.saturating_add(DURATION_TOLERANCE_SECS);
    for s in suggestions.iter().filter(|s| s.end_seconds > limit) {
        warn!(
            title = %s.title,
            end_seconds = s.end_seconds,
            duration,
            "Suggestion ends after the video"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use inky_models::{VideoMetadata, VideoReference};

    struct FixedFetcher;

    #[async_trait]
    impl MetadataFetcher for FixedFetcher {
        async fn fetch_metadata(&self, video: &VideoReference) -> ApiResult<VideoMetadata> {
            if video.id() == "missingvid0" {
                return Err(ApiError::not_found("Video not found"));
            }
            Ok(VideoMetadata {
                title: "Funny Cat".to_string(),
                description: None,
                channel_title: "Cats".to_string(),
                duration: "PT5M0S".to_string(),
                thumbnail_url: String::new(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingModel {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SuggestionModel for RecordingModel {
        async fn generate(&self, prompt: &str) -> ApiResult<String> {
            self.prompts
                .lock()
                .map_err(|_| ApiError::internal("poisoned"))?
                .push(prompt.to_string());
            Ok("1. Cat Jumps\n1:05 - 1:20\nSudden jump scares the cat\n\nbroken".to_string())
        }
    }

    fn analyzer(model: Arc<RecordingModel>) -> VideoAnalyzer {
        VideoAnalyzer::new(Arc::new(FixedFetcher), model)
    }

    #[tokio::test]
    async fn test_analyze_skips_malformed_blocks() {
        let model = Arc::new(RecordingModel::default());
        let result = analyzer(model.clone())
            .analyze("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(result.video.id(), "dQw4w9WgXcQ");
        assert_eq!(result.watch_url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(result.metadata.title, "Funny Cat");
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].title, "Cat Jumps");
        assert_eq!(result.suggestions[0].start_seconds, 65);
        assert_eq!(result.suggestions[0].end_seconds, 80);

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Funny Cat"));
    }

    #[tokio::test]
    async fn test_invalid_url_never_calls_upstream() {
        let model = Arc::new(RecordingModel::default());
        let err = analyzer(model.clone()).analyze("not a url").await.unwrap_err();

        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == "Invalid video URL"));
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_propagates() {
        let model = Arc::new(RecordingModel::default());
        let err = analyzer(model.clone())
            .analyze("https://youtu.be/missingvid0")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(model.prompts.lock().unwrap().is_empty());
    }
}
