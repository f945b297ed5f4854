//! YouTube Data API client.

use std::time::Instant;

use inky_models::VideoMetadata;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::UpstreamConfig;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::services::endpoint;

/// Client for `videos.list` on the YouTube Data API v3.
pub struct YoutubeClient {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    snippet: Snippet,
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

impl Thumbnails {
    fn best_url(self) -> Option<String> {
        self.high.or(self.medium).or(self.default).map(|t| t.url)
    }
}

impl VideoItem {
    fn into_metadata(self) -> VideoMetadata {
        let description = Some(self.snippet.description).filter(|d| !d.trim().is_empty());
        VideoMetadata {
            title: self.snippet.title,
            description,
            channel_title: self.snippet.channel_title,
            duration: self.content_details.duration,
            thumbnail_url: self.snippet.thumbnails.best_url().unwrap_or_default(),
        }
    }
}

impl YoutubeClient {
    /// Create a client. Requires `YOUTUBE_API_KEY` to be configured.
    pub fn new(config: &UpstreamConfig, client: Client) -> ApiResult<Self> {
        let api_key = config.youtube_api_key.clone().ok_or_else(|| {
            ApiError::internal("YOUTUBE_API_KEY not configured. Cannot fetch video metadata.")
        })?;

        Ok(Self {
            api_key,
            base_url: config.youtube_base_url.clone(),
            client,
        })
    }

    /// Fetch snippet and content details for one video.
    pub async fn get_video_details(&self, video_id: &str) -> ApiResult<VideoMetadata> {
        let start = Instant::now();
        let result = self.request_video(video_id).await;
        metrics::record_upstream_call("youtube", result.is_ok(), start.elapsed().as_secs_f64());
        result
    }

    async fn request_video(&self, video_id: &str) -> ApiResult<VideoMetadata> {
        debug!(video_id = %video_id, "Fetching YouTube video details");

        let response = self
            .client
            .get(endpoint(&self.base_url, "videos"))
            .query(&[
                ("part", "snippet,contentDetails"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::upstream(format!(
                "YouTube API returned {}: {}",
                status, error_text
            )));
        }

        let body: VideoListResponse = response.json().await?;

        let item = body
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found("Video not found"))?;

        info!(video_id = %video_id, "Retrieved YouTube video details");
        Ok(item.into_metadata())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::services::http_client;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> YoutubeClient {
        let config = UpstreamConfig {
            youtube_api_key: Some("test-key".to_string()),
            youtube_base_url: server.uri(),
            timeout: Duration::from_secs(5),
            ..UpstreamConfig::default()
        };
        YoutubeClient::new(&config, Client::new()).unwrap()
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = UpstreamConfig {
            youtube_api_key: Some("test-key".to_string()),
            youtube_base_url: server.uri(),
            timeout: Duration::from_millis(50),
            ..UpstreamConfig::default()
        };
        let client = YoutubeClient::new(&config, http_client(&config).unwrap()).unwrap();

        let err = client.get_video_details("dQw4w9WgXcQ").await.unwrap_err();
        match err {
            ApiError::Upstream(msg) => {
                assert!(msg.contains("timed out"), "unexpected message: {msg}");
                assert!(!msg.contains("test-key"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_video_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", "dQw4w9WgXcQ"))
            .and(query_param("part", "snippet,contentDetails"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "snippet": {
                        "title": "Funny Cat",
                        "description": "",
                        "channelTitle": "Cats",
                        "thumbnails": {
                            "medium": {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/mqdefault.jpg"},
                            "high": {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"}
                        }
                    },
                    "contentDetails": {"duration": "PT5M0S"}
                }]
            })))
            .mount(&server)
            .await;

        let meta = client_for(&server).get_video_details("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(meta.title, "Funny Cat");
        assert_eq!(meta.channel_title, "Cats");
        assert_eq!(meta.duration, "PT5M0S");
        assert_eq!(meta.description, None);
        assert_eq!(meta.thumbnail_url, "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg");
    }

    #[tokio::test]
    async fn test_zero_items_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).get_video_details("dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_http_failure_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quotaExceeded"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_video_details("dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(ref msg) if msg.contains("403")));
    }

    #[test]
    fn test_new_requires_key() {
        let config = UpstreamConfig::default();
        assert!(YoutubeClient::new(&config, Client::new()).is_err());
    }
}
