//! Analysis response payload.

use schemars::JsonSchema;
use serde::Serialize;

use crate::suggestion::ClipSuggestion;
use crate::video::{VideoMetadata, VideoReference};

/// Metadata plus ordered clip suggestions for one analyzed video.
///
/// `video` is the reference the server extracted from the submitted URL;
/// clients key follow-up requests on its id.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub video: VideoReference,
    pub watch_url: String,
    pub metadata: VideoMetadata,
    pub suggestions: Vec<ClipSuggestion>,
}

impl AnalysisResult {
    pub fn new(
        video: VideoReference,
        metadata: VideoMetadata,
        suggestions: Vec<ClipSuggestion>,
    ) -> Self {
        Self {
            watch_url: video.watch_url(),
            video,
            metadata,
            suggestions,
        }
    }
}
