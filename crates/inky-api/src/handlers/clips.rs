//! Clip download handler.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use inky_models::timestamp::parse_clip_time;
use inky_models::VideoReference;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::security::{require_param, MAX_TIME_PARAM_LENGTH};
use crate::state::AppState;

/// Longest accepted video id (Bilibili BV ids are 12 characters today).
const MAX_VIDEO_ID_LENGTH: usize = 32;

/// Query parameters for `GET /api/download-clip`.
///
/// `start` and `end` accept whole seconds or `MM:SS`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadClipParams {
    pub video_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadClipResponse {
    pub clip_url: String,
}

/// A validated clip request.
#[derive(Debug, PartialEq)]
struct ClipRequest {
    video: VideoReference,
    start_seconds: u32,
    end_seconds: u32,
}

impl DownloadClipParams {
    fn validate(&self) -> ApiResult<ClipRequest> {
        let video_id = require_param(self.video_id.as_deref(), "videoId", MAX_VIDEO_ID_LENGTH)?;
        let start = require_param(self.start.as_deref(), "start", MAX_TIME_PARAM_LENGTH)?;
        let end = require_param(self.end.as_deref(), "end", MAX_TIME_PARAM_LENGTH)?;

        let video = VideoReference::from_id(video_id)
            .ok_or_else(|| ApiError::bad_request("Invalid video ID"))?;

        let start_seconds = parse_clip_time(start)
            .map_err(|e| ApiError::bad_request(format!("Invalid start time: {}", e)))?;
        let end_seconds = parse_clip_time(end)
            .map_err(|e| ApiError::bad_request(format!("Invalid end time: {}", e)))?;

        if end_seconds <= start_seconds {
            return Err(ApiError::bad_request("End time must be after start time"));
        }

        Ok(ClipRequest {
            video,
            start_seconds,
            end_seconds,
        })
    }
}

/// Return a URL for a clip of the given range.
pub async fn download_clip(
    State(state): State<AppState>,
    params: Result<Query<DownloadClipParams>, QueryRejection>,
) -> ApiResult<Json<DownloadClipResponse>> {
    let result = materialize(&state, params).await;
    match &result {
        Ok(_) => metrics::record_clip_request("success"),
        Err(e) => metrics::record_clip_request(e.kind()),
    }
    result
}

async fn materialize(
    state: &AppState,
    params: Result<Query<DownloadClipParams>, QueryRejection>,
) -> ApiResult<Json<DownloadClipResponse>> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let request = params.validate()?;

    let clip_url = state
        .materializer
        .materialize(&request.video, request.start_seconds, request.end_seconds)
        .await?;

    info!(
        video = %request.video,
        start_seconds = request.start_seconds,
        end_seconds = request.end_seconds,
        "Clip URL issued"
    );

    Ok(Json(DownloadClipResponse { clip_url }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(video_id: Option<&str>, start: Option<&str>, end: Option<&str>) -> DownloadClipParams {
        DownloadClipParams {
            video_id: video_id.map(String::from),
            start: start.map(String::from),
            end: end.map(String::from),
        }
    }

    #[test]
    fn test_validate_accepts_seconds_and_timestamps() {
        let request = params(Some("dQw4w9WgXcQ"), Some("65"), Some("01:20"))
            .validate()
            .unwrap();
        assert_eq!(request.video.id(), "dQw4w9WgXcQ");
        assert_eq!(request.start_seconds, 65);
        assert_eq!(request.end_seconds, 80);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let cases = [
            params(None, Some("1"), Some("2")),
            params(Some("dQw4w9WgXcQ"), None, Some("2")),
            params(Some("short"), Some("1"), Some("2")),
            params(Some("dQw4w9WgXcQ"), Some("abc"), Some("2")),
            params(Some("dQw4w9WgXcQ"), Some("30"), Some("30")),
            params(Some("dQw4w9WgXcQ"), Some("00:40"), Some("00:30")),
        ];

        for case in cases {
            let err = case.validate().unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "{:?}", case);
        }
    }

    #[test]
    fn test_validate_bilibili_id() {
        let request = params(Some("BV1xx411c7mD"), Some("0"), Some("15"))
            .validate()
            .unwrap();
        assert_eq!(request.video.platform(), inky_models::Platform::Bilibili);
    }
}
