//! Bilibili web API client.

use std::time::Instant;

use inky_models::{timestamp::format_iso8601_duration, VideoMetadata};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::UpstreamConfig;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::services::endpoint;

/// Bilibili response codes meaning the video does not exist or is hidden.
const NOT_FOUND_CODES: &[i64] = &[-404, 62002, 62004, 62012];

/// Client for the public `x/web-interface/view` endpoint.
pub struct BilibiliClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ViewResponse {
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<ViewData>,
}

#[derive(Debug, Deserialize)]
struct ViewData {
    title: String,
    #[serde(default)]
    desc: String,
    owner: Owner,
    /// Length in seconds
    duration: u32,
    #[serde(default)]
    pic: String,
}

#[derive(Debug, Deserialize)]
struct Owner {
    name: String,
}

impl ViewData {
    fn into_metadata(self) -> VideoMetadata {
        // Bilibili uses "-" for an empty description
        let desc = self.desc.trim();
        let description = (!desc.is_empty() && desc != "-").then(|| self.desc.clone());

        VideoMetadata {
            title: self.title,
            description,
            channel_title: self.owner.name,
            duration: format_iso8601_duration(self.duration),
            thumbnail_url: upgrade_scheme(self.pic),
        }
    }
}

/// Cover images are sometimes returned with plain http.
fn upgrade_scheme(url: String) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url,
    }
}

impl BilibiliClient {
    pub fn new(config: &UpstreamConfig, client: Client) -> Self {
        Self {
            base_url: config.bilibili_base_url.clone(),
            client,
        }
    }

    /// Fetch title, uploader and duration for a BV id.
    pub async fn get_video_details(&self, bvid: &str) -> ApiResult<VideoMetadata> {
        let start = Instant::now();
        let result = self.request_view(bvid).await;
        metrics::record_upstream_call("bilibili", result.is_ok(), start.elapsed().as_secs_f64());
        result
    }

    async fn request_view(&self, bvid: &str) -> ApiResult<VideoMetadata> {
        debug!(bvid = %bvid, "Fetching Bilibili video details");

        let response = self
            .client
            .get(endpoint(&self.base_url, "x/web-interface/view"))
            .query(&[("bvid", bvid)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::upstream(format!(
                "Bilibili API returned {}: {}",
                status, error_text
            )));
        }

        let body: ViewResponse = response.json().await?;

        if body.code != 0 {
            if NOT_FOUND_CODES.contains(&body.code) {
                return Err(ApiError::not_found("Video not found"));
            }
            warn!(bvid = %bvid, code = body.code, message = %body.message, "Bilibili API rejected request");
            return Err(ApiError::upstream(format!(
                "Bilibili API error {}: {}",
                body.code, body.message
            )));
        }

        let data = body
            .data
            .ok_or_else(|| ApiError::upstream("Bilibili response missing data"))?;

        info!(bvid = %bvid, "Retrieved Bilibili video details");
        Ok(data.into_metadata())
    }
}
